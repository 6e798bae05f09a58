//! Coordinate type definitions

use std::fmt;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A geographic point in decimal degrees.
///
/// Used for query centres and report targets. Unlike [`crate::asset::AssetRecord`]
/// a point carries no admissibility guarantee beyond what the caller checks.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point without validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a point, rejecting coordinates outside the world range.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        super::validate_coordinates(latitude, longitude)?;
        Ok(Self::new(latitude, longitude))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Rectangular latitude/longitude region with inclusive edges.
///
/// Always satisfies `south <= north` and `west <= east`. Boxes crossing the
/// antimeridian are not representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting NaN or inverted edges.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, CoordError> {
        if north.is_nan() || south.is_nan() || east.is_nan() || west.is_nan() {
            return Err(CoordError::InvalidBounds {
                north,
                south,
                east,
                west,
            });
        }
        if south > north || west > east {
            return Err(CoordError::InvalidBounds {
                north,
                south,
                east,
                west,
            });
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    #[inline]
    pub fn north(&self) -> f64 {
        self.north
    }

    #[inline]
    pub fn south(&self) -> f64 {
        self.south
    }

    #[inline]
    pub fn east(&self) -> f64 {
        self.east
    }

    #[inline]
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Returns true if the point lies inside the box or on its edge.
    #[inline]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }
}

/// Dataset-specific region that every asset record must fall inside.
///
/// Bounds are inclusive. The default covers the New York City area, where
/// the hydrant dataset this crate was built around lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissibleRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl AdmissibleRegion {
    /// New York City area: 40..=41 N, -75..=-73 E.
    pub const NEW_YORK: Self = Self {
        min_lat: 40.0,
        max_lat: 41.0,
        min_lon: -75.0,
        max_lon: -73.0,
    };

    /// The whole world; only the global coordinate range applies.
    pub const WORLD: Self = Self {
        min_lat: MIN_LAT,
        max_lat: MAX_LAT,
        min_lon: MIN_LON,
        max_lon: MAX_LON,
    };

    /// Creates a region, rejecting NaN or inverted bounds.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, CoordError> {
        // Reuse the bounding box checks; the edge order differs only in naming.
        BoundingBox::new(max_lat, min_lat, max_lon, min_lon)?;
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Returns true if the coordinates are within the world range and this region.
    #[inline]
    pub fn admits(&self, latitude: f64, longitude: f64) -> bool {
        (MIN_LAT..=MAX_LAT).contains(&latitude)
            && (MIN_LON..=MAX_LON).contains(&longitude)
            && (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

impl Default for AdmissibleRegion {
    fn default() -> Self {
        Self::NEW_YORK
    }
}

/// Errors that can occur when building or validating coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-90.0 to 90.0)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Coordinates are valid but outside the dataset's admissible region
    OutsideRegion { latitude: f64, longitude: f64 },
    /// Bounding box edges are NaN or inverted
    InvalidBounds {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::OutsideRegion {
                latitude,
                longitude,
            } => {
                write!(
                    f,
                    "Coordinates ({}, {}) are outside the admissible region",
                    latitude, longitude
                )
            }
            CoordError::InvalidBounds {
                north,
                south,
                east,
                west,
            } => {
                write!(
                    f,
                    "Invalid bounding box: north={} south={} east={} west={} \
                     (requires south <= north and west <= east)",
                    north, south, east, west
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
