//! Parser for comma-separated asset exports.
//!
//! The format is line based:
//! - The first non-blank line is a header naming the columns
//! - Every following non-blank line is one asset row
//! - Fields may be double-quoted; `""` inside quotes is a literal quote and
//!   commas inside quotes do not split fields
//!
//! We extract the latitude and longitude columns only. Rows that are short,
//! unparsable, or outside the admissible region are dropped without error;
//! the counts are available through [`AssetCsvParser::parse_with_stats`].

use crate::coord::AdmissibleRegion;

use super::AssetRecord;

/// Column name for latitude, compared case-insensitively.
const LATITUDE_COLUMN: &str = "latitude";

/// Column name for longitude, compared case-insensitively.
const LONGITUDE_COLUMN: &str = "longitude";

/// Error type for asset source parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The source had no non-blank lines.
    #[error("Asset source is empty")]
    EmptyData,
    /// The header row does not name both coordinate columns.
    #[error("Could not find LATITUDE or LONGITUDE columns in header: {header:?}")]
    MissingColumns { header: Vec<String> },
}

/// Counts of what happened to each data row during a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Non-blank data rows seen (header excluded)
    pub rows: usize,
    /// Rows that produced a record
    pub accepted: usize,
    /// Rows with too few fields to reach both coordinate columns
    pub short_rows: usize,
    /// Rows whose coordinates were not finite numbers
    pub unparsable: usize,
    /// Subset of `unparsable` where a coordinate is a number followed by
    /// other text (`40.7 N`); lenient float parsers would have kept these
    pub numeric_prefix: usize,
    /// Rows with valid numbers outside the admissible region
    pub out_of_region: usize,
}

impl ParseStats {
    /// Total number of rows dropped for any reason.
    pub fn dropped(&self) -> usize {
        self.short_rows + self.unparsable + self.out_of_region
    }
}

/// Records plus the diagnostic counts from parsing them.
#[derive(Debug, Clone)]
pub struct ParsedAssets {
    pub records: Vec<AssetRecord>,
    pub stats: ParseStats,
}

/// Parser for asset CSV exports.
pub struct AssetCsvParser;

impl AssetCsvParser {
    /// Parse all records from `text`, keeping only those inside `region`.
    pub fn parse(text: &str, region: &AdmissibleRegion) -> Result<Vec<AssetRecord>, ParseError> {
        Self::parse_with_stats(text, region).map(|parsed| parsed.records)
    }

    /// Parse all records and report how many rows were dropped and why.
    pub fn parse_with_stats(
        text: &str,
        region: &AdmissibleRegion,
    ) -> Result<ParsedAssets, ParseError> {
        let mut lines = text.split('\n').map(str::trim).filter(|l| !l.is_empty());

        let header_line = lines.next().ok_or(ParseError::EmptyData)?;
        let header = split_fields(header_line);

        let lat_index = column_index(&header, LATITUDE_COLUMN);
        let lon_index = column_index(&header, LONGITUDE_COLUMN);
        let (lat_index, lon_index) = match (lat_index, lon_index) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(ParseError::MissingColumns { header }),
        };
        let required = lat_index.max(lon_index);

        let mut records = Vec::new();
        let mut stats = ParseStats::default();

        for line in lines {
            stats.rows += 1;
            let fields = split_fields(line);

            if fields.len() <= required {
                stats.short_rows += 1;
                continue;
            }

            let coords = (
                parse_coordinate(&fields[lat_index]),
                parse_coordinate(&fields[lon_index]),
            );
            let (latitude, longitude) = match coords {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => {
                    stats.unparsable += 1;
                    if has_numeric_prefix(&fields[lat_index]) || has_numeric_prefix(&fields[lon_index])
                    {
                        stats.numeric_prefix += 1;
                    }
                    continue;
                }
            };

            match AssetRecord::new(latitude, longitude, region) {
                Ok(record) => {
                    stats.accepted += 1;
                    records.push(record);
                }
                Err(_) => stats.out_of_region += 1,
            }
        }

        tracing::debug!(
            rows = stats.rows,
            accepted = stats.accepted,
            short_rows = stats.short_rows,
            unparsable = stats.unparsable,
            numeric_prefix = stats.numeric_prefix,
            out_of_region = stats.out_of_region,
            "Parsed asset source"
        );

        Ok(ParsedAssets { records, stats })
    }
}

/// Find a header column by name, ignoring case. First occurrence wins.
fn column_index(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|col| col.eq_ignore_ascii_case(name))
}

/// Parse a coordinate field, rejecting anything that is not a finite number.
fn parse_coordinate(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True if the field does not parse but some shorter prefix of it does.
fn has_numeric_prefix(field: &str) -> bool {
    parse_coordinate(field).is_none()
        && (1..field.len())
            .rev()
            .filter(|&end| field.is_char_boundary(end))
            .any(|end| parse_coordinate(field[..end].trim_end()).is_some())
}

/// Split one line into trimmed fields, honoring double-quote escaping.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if inside_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
