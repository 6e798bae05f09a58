//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let source_path = config
        .source
        .path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let source_url = config.source.url.as_deref().unwrap_or("");

    format!(
        r#"[source]
; Asset export (CSV with LATITUDE and LONGITUDE columns)
; Local file path, e.g. path = ~/data/hydrants.csv
path = {}
; Remote export URL; used instead of path when set
url = {}
; HTTP timeout in seconds (default: 30)
timeout = {}

[region]
; Records outside this region are dropped when the export is loaded
; Defaults cover New York City: 40..41 N, -75..-73 E
min_lat = {}
max_lat = {}
min_lon = {}
max_lon = {}

[query]
; Maximum records returned when no limit is given (default: 500)
default_limit = {}
; Radius in km for nearby queries when none is given (default: 2)
default_radius_km = {}

[location]
; Timeout per location attempt in milliseconds (default: 8000)
timeout_ms = {}
; Oldest acceptable position fix in seconds (default: 600)
max_age_secs = {}
; Ask for a high-accuracy fix first (default: false)
high_accuracy = {}
; After a high-accuracy timeout, retry once at low accuracy (default: true)
fallback_on_timeout = {}

[proximity]
; Reporters must be within this many meters of an asset (default: 50)
threshold_meters = {}
; A supplied position this close to the asset, in degrees on both axes,
; is treated as the asset itself and a fresh fix is taken (default: 0.0001)
epsilon_degrees = {}
; Supplied positions older than this many seconds are re-acquired (default: 30)
max_candidate_age_secs = {}

[logging]
; Log directory (default: logs)
directory = {}
; Log file name (default: geogate.log)
file = {}
"#,
        source_path,
        source_url,
        config.source.timeout,
        config.region.min_lat,
        config.region.max_lat,
        config.region.min_lon,
        config.region.max_lon,
        config.query.default_limit,
        config.query.default_radius_km,
        config.location.timeout_ms,
        config.location.max_age_secs,
        config.location.high_accuracy,
        config.location.fallback_on_timeout,
        config.proximity.threshold_meters,
        config.proximity.epsilon_degrees,
        config.proximity.max_candidate_age_secs,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
