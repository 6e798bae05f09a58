//! User configuration for GeoGate.
//!
//! Settings are read from `~/.geogate/config.ini`. Every key is optional;
//! anything missing falls back to the library defaults. Each settings
//! struct converts into the runtime config of the module it controls
//! (see [`LocationSettings::acquire_config`] and friends).
//!
//! # Example
//!
//! ```
//! use geogate::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let acquire = config.location.acquire_config();
//! assert!(acquire.fallback_on_timeout);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_LOCATION_MAX_AGE_SECS, DEFAULT_LOCATION_TIMEOUT_MS, DEFAULT_MAX_CANDIDATE_AGE_SECS,
    DEFAULT_SOURCE_TIMEOUT_SECS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, LocationSettings, LoggingSettings, ProximitySettings, QuerySettings,
    RegionSettings, SourceSettings,
};
