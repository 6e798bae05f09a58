//! Gate outcomes and errors

use serde::Serialize;

use crate::coord::CoordError;
use crate::location::LocationError;
use crate::report::ReportSinkError;

/// Outcome of a proximity check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProximityResult {
    pub accepted: bool,
    pub distance_meters: f64,
    pub threshold_meters: f64,
}

impl ProximityResult {
    /// Accepts when `distance_meters <= threshold_meters`.
    pub fn evaluate(distance_meters: f64, threshold_meters: f64) -> Self {
        Self {
            accepted: distance_meters <= threshold_meters,
            distance_meters,
            threshold_meters,
        }
    }

    /// Converts a rejection into [`ProximityError::DistanceExceeded`].
    pub fn require_accepted(self) -> Result<Self, ProximityError> {
        if self.accepted {
            Ok(self)
        } else {
            Err(ProximityError::DistanceExceeded {
                distance_meters: self.distance_meters,
                threshold_meters: self.threshold_meters,
            })
        }
    }
}

/// Errors from the proximity gate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProximityError {
    /// A fresh fix was needed and could not be obtained.
    #[error("Could not determine your location: {0}")]
    LocationUnavailable(#[source] LocationError),

    /// The reporter is too far from the asset. Recoverable by moving closer.
    #[error(
        "You must be within {threshold_meters:.0}m of the asset to report it (currently {distance_meters:.0}m away)"
    )]
    DistanceExceeded {
        distance_meters: f64,
        threshold_meters: f64,
    },

    /// The target coordinates are outside the world range.
    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] CoordError),

    /// The verified report could not be created.
    #[error(transparent)]
    Sink(#[from] ReportSinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(ProximityResult::evaluate(50.0, 50.0).accepted);
        assert!(!ProximityResult::evaluate(50.1, 50.0).accepted);
    }

    #[test]
    fn test_require_accepted() {
        assert!(ProximityResult::evaluate(10.0, 50.0).require_accepted().is_ok());

        let err = ProximityResult::evaluate(120.4, 50.0)
            .require_accepted()
            .unwrap_err();
        match err {
            ProximityError::DistanceExceeded {
                distance_meters,
                threshold_meters,
            } => {
                assert_eq!(distance_meters, 120.4);
                assert_eq!(threshold_meters, 50.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_distance_exceeded_message() {
        let err = ProximityError::DistanceExceeded {
            distance_meters: 120.4,
            threshold_meters: 50.0,
        };
        assert_eq!(
            err.to_string(),
            "You must be within 50m of the asset to report it (currently 120m away)"
        );
    }
}
