//! GeoGate - Asset lookup and proximity-gated reporting
//!
//! This library loads a CSV export of geolocated assets (fire hydrants in
//! the reference deployment), answers spatial queries over it, and gates
//! the submission of field reports on the reporter being physically near
//! the asset.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use geogate::config::ConfigFile;
//! use geogate::coord::GeoPoint;
//! use geogate::location::ManualLocationProvider;
//! use geogate::service::GeoGateService;
//!
//! let config = ConfigFile::load()?;
//! let device = ManualLocationProvider::new(GeoPoint::new(40.7128, -74.0060), 5.0);
//! let service = GeoGateService::from_config(&config, None, device)?;
//!
//! let nearby = service.nearby(GeoPoint::new(40.7128, -74.0060), Some(0.5), None).await?;
//! let check = service.verify(nearby[0].point(), None).await?;
//! ```

pub mod asset;
pub mod cache;
pub mod config;
pub mod coord;
pub mod location;
pub mod logging;
pub mod proximity;
pub mod query;
pub mod report;
pub mod service;

/// Version of the GeoGate library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
