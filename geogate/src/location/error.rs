//! Location acquisition errors

use std::time::Duration;

/// Why a fix could not be obtained.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// The user or platform refused location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The provider could not determine a position.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// No fix arrived within the request timeout.
    #[error("Location request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A fix arrived but is older than the request allows.
    #[error("Location fix is {}ms old, maximum age is {}ms", age.as_millis(), max_age.as_millis())]
    StaleFix { age: Duration, max_age: Duration },

    /// No location capability on this platform.
    #[error("Location services are not supported")]
    Unsupported,
}

impl LocationError {
    /// Returns true if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, LocationError::Timeout(_))
    }
}
