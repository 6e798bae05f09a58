//! Location fix and request types

use std::time::{Duration, Instant};

use crate::coord::GeoPoint;

/// A device position measurement.
///
/// Produced only by a [`LocationProvider`](super::LocationProvider) and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Estimated horizontal accuracy in meters (lower is better)
    pub accuracy: f64,
    /// When the measurement was taken
    pub timestamp: Instant,
}

impl LocationFix {
    /// Creates a fix measured now.
    pub fn now(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp: Instant::now(),
        }
    }

    /// Creates a fix that was measured `age` ago.
    pub fn aged(latitude: f64, longitude: f64, accuracy: f64, age: Duration) -> Self {
        let now = Instant::now();
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp: now.checked_sub(age).unwrap_or(now),
        }
    }

    /// The fix position as a point.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Time elapsed since the measurement.
    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Parameters for a single provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixRequest {
    /// Upper bound on how long the provider may take
    pub timeout: Duration,
    /// Oldest acceptable cached measurement
    pub max_age: Duration,
    /// Ask for the accurate (slower, power hungry) tier
    pub high_accuracy: bool,
}
