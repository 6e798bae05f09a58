//! Service error types.

use crate::cache::SourceError;
use crate::location::LocationError;
use crate::proximity::ProximityError;
use crate::query::QueryError;
use std::fmt;

/// Errors that can occur during service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// No asset source configured or given on the command line
    NoSource,
    /// The asset source could not be set up
    SourceError(SourceError),
    /// Invalid configuration
    ConfigError(String),
    /// Invalid coordinates
    InvalidCoordinates { lat: f64, lon: f64, reason: String },
    /// Spatial query failed (including cache load failures)
    QueryError(QueryError),
    /// Location acquisition failed
    LocationError(LocationError),
    /// Proximity check or report submission failed
    ProximityError(ProximityError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSource => write!(f, "No asset source configured"),
            Self::SourceError(e) => write!(f, "Asset source error: {}", e),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InvalidCoordinates { lat, lon, reason } => {
                write!(f, "Invalid coordinates ({}, {}): {}", lat, lon, reason)
            }
            Self::QueryError(e) => write!(f, "Query failed: {}", e),
            Self::LocationError(e) => write!(f, "Location error: {}", e),
            Self::ProximityError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceError(e) => Some(e),
            Self::QueryError(e) => Some(e),
            Self::LocationError(e) => Some(e),
            Self::ProximityError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SourceError> for ServiceError {
    fn from(e: SourceError) -> Self {
        Self::SourceError(e)
    }
}

impl From<QueryError> for ServiceError {
    fn from(e: QueryError) -> Self {
        Self::QueryError(e)
    }
}

impl From<LocationError> for ServiceError {
    fn from(e: LocationError) -> Self {
        Self::LocationError(e)
    }
}

impl From<ProximityError> for ServiceError {
    fn from(e: ProximityError) -> Self {
        Self::ProximityError(e)
    }
}
