//! Proximity gate configuration

use std::time::Duration;

use crate::location::DEFAULT_ACQUIRE_TIMEOUT;

/// Default maximum reporter-to-asset distance in meters.
pub const DEFAULT_THRESHOLD_METERS: f64 = 50.0;

/// Default per-axis tolerance, in degrees, under which a candidate fix is
/// treated as coinciding with the target.
pub const DEFAULT_EPSILON_DEGREES: f64 = 1e-4;

/// Default oldest candidate fix the gate will evaluate without re-acquiring.
pub const DEFAULT_MAX_CANDIDATE_AGE: Duration = Duration::from_secs(30);

/// Configuration for [`ProximityGate`](super::ProximityGate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Acceptance distance, inclusive
    pub threshold_meters: f64,
    /// Candidates within this many degrees of the target on both axes are
    /// assumed to be echoes of the target, not measurements
    pub epsilon_degrees: f64,
    /// Candidates older than this are re-acquired
    pub max_candidate_age: Duration,
    /// Timeout for the fresh high-accuracy fix
    pub fix_timeout: Duration,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            threshold_meters: DEFAULT_THRESHOLD_METERS,
            epsilon_degrees: DEFAULT_EPSILON_DEGREES,
            max_candidate_age: DEFAULT_MAX_CANDIDATE_AGE,
            fix_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl ProximityConfig {
    pub fn with_threshold_meters(mut self, threshold: f64) -> Self {
        self.threshold_meters = threshold;
        self
    }

    pub fn with_epsilon_degrees(mut self, epsilon: f64) -> Self {
        self.epsilon_degrees = epsilon;
        self
    }

    pub fn with_max_candidate_age(mut self, age: Duration) -> Self {
        self.max_candidate_age = age;
        self
    }

    pub fn with_fix_timeout(mut self, timeout: Duration) -> Self {
        self.fix_timeout = timeout;
        self
    }
}
