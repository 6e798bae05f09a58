//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! Conversions into the runtime configuration types live at the bottom.

use std::path::PathBuf;
use std::time::Duration;

use crate::coord::{AdmissibleRegion, CoordError};
use crate::location::AcquireConfig;
use crate::proximity::ProximityConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Asset source settings
    pub source: SourceSettings,
    /// Admissible region for asset records
    pub region: RegionSettings,
    /// Spatial query defaults
    pub query: QuerySettings,
    /// Location acquisition settings
    pub location: LocationSettings,
    /// Proximity gate settings
    pub proximity: ProximitySettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Asset source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Local CSV export
    pub path: Option<PathBuf>,
    /// Remote CSV export; takes precedence over `path` when both are set
    pub url: Option<String>,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

/// Admissible region configuration, inclusive degree bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSettings {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Query defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuerySettings {
    /// Result limit when none is given
    pub default_limit: usize,
    /// Radius in kilometers when none is given
    pub default_radius_km: f64,
}

/// Location acquisition configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSettings {
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Oldest acceptable fix in seconds
    pub max_age_secs: u64,
    /// Request the accurate tier first
    pub high_accuracy: bool,
    /// Retry once at low accuracy after a high-accuracy timeout
    pub fallback_on_timeout: bool,
}

/// Proximity gate configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximitySettings {
    /// Maximum reporter-to-asset distance in meters
    pub threshold_meters: f64,
    /// Per-axis tolerance under which a fix is treated as the target itself
    pub epsilon_degrees: f64,
    /// Candidate fixes older than this are re-acquired
    pub max_candidate_age_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: PathBuf,
    /// Log file name within `directory`
    pub file: String,
}

impl SourceSettings {
    /// The configured source location, URL first.
    pub fn location(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| self.path.as_ref().map(|p| p.display().to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl RegionSettings {
    pub fn to_region(&self) -> Result<AdmissibleRegion, CoordError> {
        AdmissibleRegion::new(self.min_lat, self.max_lat, self.min_lon, self.max_lon)
    }
}

impl LocationSettings {
    pub fn acquire_config(&self) -> AcquireConfig {
        AcquireConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            max_age: Duration::from_secs(self.max_age_secs),
            high_accuracy: self.high_accuracy,
            fallback_on_timeout: self.fallback_on_timeout,
        }
    }
}

impl ProximitySettings {
    /// Gate configuration; the fresh fix uses the location timeout.
    pub fn proximity_config(&self, location: &LocationSettings) -> ProximityConfig {
        ProximityConfig {
            threshold_meters: self.threshold_meters,
            epsilon_degrees: self.epsilon_degrees,
            max_candidate_age: Duration::from_secs(self.max_candidate_age_secs),
            fix_timeout: Duration::from_millis(location.timeout_ms),
        }
    }
}
