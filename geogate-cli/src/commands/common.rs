//! Common types and utilities shared across CLI commands.

use geogate::asset::AssetRecord;
use geogate::cache::ConfiguredSource;
use geogate::config::ConfigFile;
use geogate::coord::{calculate_distance, GeoPoint};
use geogate::location::{LocationProvider, ManualLocationProvider};
use geogate::service::GeoGateService;
use serde::Serialize;

use crate::error::CliError;

/// Parse a `LAT,LON` argument into a validated point.
pub fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

    GeoPoint::checked(lat, lon).map_err(|e| e.to_string())
}

/// Build a service from config, with `--source` taking precedence.
pub fn build_service<P: LocationProvider>(
    config: &ConfigFile,
    source: Option<&str>,
    provider: P,
) -> Result<GeoGateService<ConfiguredSource, P>, CliError> {
    Ok(GeoGateService::from_config(config, source, provider)?)
}

/// Service for commands that never ask for a device position.
pub fn build_query_service(
    config: &ConfigFile,
    source: Option<&str>,
) -> Result<GeoGateService<ConfiguredSource, ManualLocationProvider>, CliError> {
    build_service(config, source, ManualLocationProvider::unset())
}

/// One asset line of query output.
#[derive(Debug, Serialize)]
pub struct AssetRow {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl AssetRow {
    pub fn new(record: &AssetRecord, from: Option<GeoPoint>) -> Self {
        Self {
            latitude: record.latitude(),
            longitude: record.longitude(),
            distance_km: from.map(|p| {
                calculate_distance(p.latitude, p.longitude, record.latitude(), record.longitude())
            }),
        }
    }
}

/// Print query results as a numbered list or a JSON array.
pub fn print_assets(rows: &[AssetRow], json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No assets found.");
        return Ok(());
    }

    for (i, row) in rows.iter().enumerate() {
        match row.distance_km {
            Some(d) => println!(
                "{:>4}. {:>10.6}, {:>11.6}  ({:.0} m)",
                i + 1,
                row.latitude,
                row.longitude,
                d * 1000.0
            ),
            None => println!("{:>4}. {:>10.6}, {:>11.6}", i + 1, row.latitude, row.longitude),
        }
    }
    println!();
    println!("{} asset(s)", rows.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(
            parse_point("40.7128,-74.0060").unwrap(),
            GeoPoint::new(40.7128, -74.0060)
        );
        assert_eq!(
            parse_point(" 40.7128 , -74.0060 ").unwrap(),
            GeoPoint::new(40.7128, -74.0060)
        );
    }

    #[test]
    fn test_parse_point_rejects_bad_input() {
        assert!(parse_point("40.7128").is_err());
        assert!(parse_point("north,-74.0").is_err());
        assert!(parse_point("91.0,0.0").is_err());
        assert!(parse_point("0.0,181.0").is_err());
    }

    #[test]
    fn test_asset_row_distance() {
        let record = AssetRecord::new(
            40.7138,
            -74.0060,
            &geogate::coord::AdmissibleRegion::NEW_YORK,
        )
        .unwrap();
        let row = AssetRow::new(&record, Some(GeoPoint::new(40.7128, -74.0060)));
        let d = row.distance_km.unwrap();
        assert!((d - 0.111).abs() < 0.001);

        let json = serde_json::to_value(AssetRow::new(&record, None)).unwrap();
        assert!(json.get("distance_km").is_none());
    }
}
