//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation. Runtime defaults are taken from the modules that own
//! them so the file and the library can't drift apart.

use std::path::PathBuf;

use super::settings::*;
use crate::cache::DEFAULT_FETCH_TIMEOUT;
use crate::coord::AdmissibleRegion;
use crate::location::{AcquireConfig, DEFAULT_ACQUIRE_MAX_AGE, DEFAULT_ACQUIRE_TIMEOUT};
use crate::logging::{default_log_dir, default_log_file};
use crate::proximity::{
    DEFAULT_EPSILON_DEGREES, DEFAULT_MAX_CANDIDATE_AGE, DEFAULT_THRESHOLD_METERS,
};
use crate::query::{DEFAULT_LIMIT, DEFAULT_RADIUS_KM};

/// Default HTTP timeout for the asset source, in seconds.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = DEFAULT_FETCH_TIMEOUT.as_secs();

/// Default location attempt timeout, in milliseconds.
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = DEFAULT_ACQUIRE_TIMEOUT.as_millis() as u64;

/// Default oldest acceptable fix, in seconds.
pub const DEFAULT_LOCATION_MAX_AGE_SECS: u64 = DEFAULT_ACQUIRE_MAX_AGE.as_secs();

/// Default oldest candidate fix for the proximity gate, in seconds.
pub const DEFAULT_MAX_CANDIDATE_AGE_SECS: u64 = DEFAULT_MAX_CANDIDATE_AGE.as_secs();

impl Default for ConfigFile {
    fn default() -> Self {
        let region = AdmissibleRegion::default();
        let acquire = AcquireConfig::default();

        Self {
            source: SourceSettings {
                path: None,
                url: None,
                timeout: DEFAULT_SOURCE_TIMEOUT_SECS,
            },
            region: RegionSettings {
                min_lat: region.min_lat,
                max_lat: region.max_lat,
                min_lon: region.min_lon,
                max_lon: region.max_lon,
            },
            query: QuerySettings {
                default_limit: DEFAULT_LIMIT,
                default_radius_km: DEFAULT_RADIUS_KM,
            },
            location: LocationSettings {
                timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
                max_age_secs: DEFAULT_LOCATION_MAX_AGE_SECS,
                high_accuracy: acquire.high_accuracy,
                fallback_on_timeout: acquire.fallback_on_timeout,
            },
            proximity: ProximitySettings {
                threshold_meters: DEFAULT_THRESHOLD_METERS,
                epsilon_degrees: DEFAULT_EPSILON_DEGREES,
                max_candidate_age_secs: DEFAULT_MAX_CANDIDATE_AGE_SECS,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(default_log_dir()),
                file: default_log_file().to_string(),
            },
        }
    }
}
