//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = non_empty(section, "path") {
            config.source.path = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section, "url") {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid("source", "url", v, "must start with http:// or https://"));
            }
            config.source.url = Some(v.to_string());
        }
        if let Some(v) = section.get("timeout") {
            config.source.timeout = parse_number::<u64>(v)
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    invalid("source", "timeout", v, "must be a positive integer (seconds)")
                })?;
        }
    }

    // [region] section
    if let Some(section) = ini.section(Some("region")) {
        let region = &mut config.region;
        for (key, field) in [
            ("min_lat", &mut region.min_lat),
            ("max_lat", &mut region.max_lat),
            ("min_lon", &mut region.min_lon),
            ("max_lon", &mut region.max_lon),
        ] {
            if let Some(v) = section.get(key) {
                *field = parse_finite(v)
                    .ok_or_else(|| invalid("region", key, v, "must be a number of degrees"))?;
            }
        }
    }
    if let Err(e) = config.region.to_region() {
        let r = config.region;
        return Err(invalid(
            "region",
            "bounds",
            &format!("{}..{}, {}..{}", r.min_lat, r.max_lat, r.min_lon, r.max_lon),
            &e.to_string(),
        ));
    }

    // [query] section
    if let Some(section) = ini.section(Some("query")) {
        if let Some(v) = section.get("default_limit") {
            config.query.default_limit = parse_number::<usize>(v)
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid("query", "default_limit", v, "must be a positive integer"))?;
        }
        if let Some(v) = section.get("default_radius_km") {
            config.query.default_radius_km = parse_finite(v)
                .filter(|r| *r >= 0.0)
                .ok_or_else(|| {
                    invalid("query", "default_radius_km", v, "must be a non-negative number (km)")
                })?;
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("timeout_ms") {
            config.location.timeout_ms = parse_number::<u64>(v)
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    invalid("location", "timeout_ms", v, "must be a positive integer (milliseconds)")
                })?;
        }
        if let Some(v) = section.get("max_age_secs") {
            config.location.max_age_secs = parse_number(v).map_err(|_| {
                invalid("location", "max_age_secs", v, "must be a non-negative integer (seconds)")
            })?;
        }
        if let Some(v) = section.get("high_accuracy") {
            config.location.high_accuracy = parse_bool(v);
        }
        if let Some(v) = section.get("fallback_on_timeout") {
            config.location.fallback_on_timeout = parse_bool(v);
        }
    }

    // [proximity] section
    if let Some(section) = ini.section(Some("proximity")) {
        if let Some(v) = section.get("threshold_meters") {
            config.proximity.threshold_meters = parse_finite(v)
                .filter(|t| *t > 0.0)
                .ok_or_else(|| {
                    invalid("proximity", "threshold_meters", v, "must be a positive number (meters)")
                })?;
        }
        if let Some(v) = section.get("epsilon_degrees") {
            config.proximity.epsilon_degrees = parse_finite(v)
                .filter(|e| *e >= 0.0)
                .ok_or_else(|| {
                    invalid("proximity", "epsilon_degrees", v, "must be a non-negative number (degrees)")
                })?;
        }
        if let Some(v) = section.get("max_candidate_age_secs") {
            config.proximity.max_candidate_age_secs = parse_number(v).map_err(|_| {
                invalid(
                    "proximity",
                    "max_candidate_age_secs",
                    v,
                    "must be a non-negative integer (seconds)",
                )
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Trimmed value of `key`, or `None` if missing or blank.
fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(value: &str) -> Result<T, T::Err> {
    value.trim().parse()
}

/// Parse a float, rejecting NaN and infinities.
fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
