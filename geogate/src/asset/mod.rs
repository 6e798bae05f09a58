//! Geocoded infrastructure assets.
//!
//! This module turns a delimited text export of infrastructure assets (fire
//! hydrants, streetlights, ...) into validated [`AssetRecord`]s.
//!
//! # Data Source
//!
//! The source is a comma-separated file whose header names a `latitude` and a
//! `longitude` column (matched case-insensitively). All other columns are
//! ignored.
//!
//! # Example
//!
//! ```
//! use geogate::asset::AssetCsvParser;
//! use geogate::coord::AdmissibleRegion;
//!
//! let csv = "UNITID,LATITUDE,LONGITUDE\nH1,40.7,-74.0\n";
//! let records = AssetCsvParser::parse(csv, &AdmissibleRegion::default()).unwrap();
//! assert_eq!(records.len(), 1);
//! ```

mod parser;

pub use parser::{AssetCsvParser, ParseError, ParseStats, ParsedAssets};

use crate::coord::{AdmissibleRegion, CoordError, GeoPoint};

/// A single geocoded asset.
///
/// Records are only ever constructed through validation against an
/// [`AdmissibleRegion`], so every record in the system is inside the world
/// range and inside the dataset's region.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AssetRecord {
    latitude: f64,
    longitude: f64,
}

impl AssetRecord {
    /// Create a record, rejecting coordinates outside `region`.
    pub fn new(latitude: f64, longitude: f64, region: &AdmissibleRegion) -> Result<Self, CoordError> {
        crate::coord::validate_coordinates(latitude, longitude)?;
        if !region.admits(latitude, longitude) {
            return Err(CoordError::OutsideRegion {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The record's location as a point.
    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
