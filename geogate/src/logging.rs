//! Logging infrastructure for GeoGate.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `logs/geogate.log` by default (cleared on session start)
//! - Also prints to stdout for CLI tailing
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file,
/// and sets up dual output to both file and stdout.
///
/// `default_level` applies when `RUST_LOG` is not set (e.g. "info", or
/// "debug" for verbose CLI runs).
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    default_level: &str,
) -> Result<LoggingGuard, io::Error> {
    let log_path = prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .compact();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    tracing::debug!(path = %log_path.display(), "Logging initialized");

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create the directory and truncate the log file, returning its path.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<std::path::PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

/// Get default log directory path.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    "geogate.log"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        assert_eq!(default_log_dir(), "logs");
        assert_eq!(default_log_file(), "geogate.log");
    }

    #[test]
    fn test_prepare_creates_nested_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("deep").join("logs");

        let path = prepare_log_file(&log_dir, "geogate.log").unwrap();

        assert!(log_dir.exists());
        assert_eq!(path, log_dir.join("geogate.log"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_prepare_clears_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geogate.log");
        fs::write(&path, "old log data").unwrap();

        prepare_log_file(temp_dir.path(), "geogate.log").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_prepare_fails_when_directory_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        assert!(prepare_log_file(&blocker, "geogate.log").is_err());
    }

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }

    // init_logging installs a global subscriber, so it is exercised by the
    // CLI rather than here.
}
