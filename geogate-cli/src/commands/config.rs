//! Configuration management CLI commands.
//!
//! Provides `config init`, `config show` and `config path` for creating and
//! inspecting the configuration file.

use std::path::Path;

use clap::Subcommand;
use geogate::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Create a configuration file with default settings if none exists
    Init,

    /// Show the effective configuration settings
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against the file at `path`.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init => run_init(path),
        ConfigCommands::Show => run_show(path),
        ConfigCommands::Path => run_path(path),
    }
}

fn run_init(path: &Path) -> Result<(), CliError> {
    if ConfigFile::ensure_exists_at(path)? {
        println!("Created {}", path.display());
        println!("Set [source] path or url to point at your asset export.");
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;

    println!("Configuration Settings");
    println!("======================");
    if !path.exists() {
        println!("(no file at {}, showing defaults)", path.display());
    }
    println!();

    for (section, entries) in settings(&config) {
        println!("[{}]", section);
        for (key, value) in entries {
            if value.is_empty() {
                println!("  {} = (not set)", key);
            } else {
                println!("  {} = {}", key, value);
            }
        }
        println!();
    }

    Ok(())
}

fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

type Section = (&'static str, Vec<(&'static str, String)>);

fn settings(config: &ConfigFile) -> Vec<Section> {
    let source = &config.source;
    let region = &config.region;
    let location = &config.location;
    let proximity = &config.proximity;

    vec![
        (
            "source",
            vec![
                (
                    "path",
                    source
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                ),
                ("url", source.url.clone().unwrap_or_default()),
                ("timeout", source.timeout.to_string()),
            ],
        ),
        (
            "region",
            vec![
                ("min_lat", region.min_lat.to_string()),
                ("max_lat", region.max_lat.to_string()),
                ("min_lon", region.min_lon.to_string()),
                ("max_lon", region.max_lon.to_string()),
            ],
        ),
        (
            "query",
            vec![
                ("default_limit", config.query.default_limit.to_string()),
                (
                    "default_radius_km",
                    config.query.default_radius_km.to_string(),
                ),
            ],
        ),
        (
            "location",
            vec![
                ("timeout_ms", location.timeout_ms.to_string()),
                ("max_age_secs", location.max_age_secs.to_string()),
                ("high_accuracy", location.high_accuracy.to_string()),
                (
                    "fallback_on_timeout",
                    location.fallback_on_timeout.to_string(),
                ),
            ],
        ),
        (
            "proximity",
            vec![
                ("threshold_meters", proximity.threshold_meters.to_string()),
                ("epsilon_degrees", proximity.epsilon_degrees.to_string()),
                (
                    "max_candidate_age_secs",
                    proximity.max_candidate_age_secs.to_string(),
                ),
            ],
        ),
        (
            "logging",
            vec![
                ("directory", config.logging.directory.display().to_string()),
                ("file", config.logging.file.clone()),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        run_init(&path).unwrap();
        assert!(path.exists());

        std::fs::write(&path, "[query]\ndefault_limit = 7\n").unwrap();
        run_init(&path).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap().query.default_limit, 7);
    }

    #[test]
    fn test_settings_cover_every_section() {
        let sections: Vec<&str> = settings(&ConfigFile::default())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            sections,
            ["source", "region", "query", "location", "proximity", "logging"]
        );
    }

    #[test]
    fn test_unset_source_shows_empty() {
        let all = settings(&ConfigFile::default());
        let (_, source) = &all[0];
        assert_eq!(source[0], ("path", String::new()));
        assert_eq!(source[1], ("url", String::new()));
    }
}
