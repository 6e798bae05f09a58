//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geogate::config::ConfigFileError;
use geogate::proximity::ProximityError;
use geogate::query::QueryError;
use geogate::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// A library operation failed
    Service(ServiceError),
    /// Failed to encode JSON output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Service(ServiceError::NoSource) => {
                eprintln!();
                eprintln!("Tell GeoGate where the asset export lives, either:");
                eprintln!("  1. Pass --source <PATH|URL> on the command line");
                eprintln!("  2. Set path or url under [source] in the config file");
                eprintln!("     (run 'geogate config init' to create one)");
            }
            CliError::Service(ServiceError::QueryError(QueryError::Cache(_))) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The file or URL does not exist or is unreachable");
                eprintln!("  2. The header has no LATITUDE and LONGITUDE columns");
            }
            CliError::Service(ServiceError::ProximityError(
                ProximityError::LocationUnavailable(_),
            )) => {
                eprintln!();
                eprintln!("No device position is available. Pass --at LAT,LON.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
            CliError::Service(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_service_error_passes_through() {
        let err = CliError::from(ServiceError::NoSource);
        assert_eq!(err.to_string(), "No asset source configured");
    }

    #[test]
    fn test_display_config_error() {
        let err = CliError::Config("bad value".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_source_chain() {
        let err = CliError::from(ServiceError::NoSource);
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&CliError::InvalidArgument("x".into())).is_none());
    }
}
