//! High-level service facade for GeoGate operations.
//!
//! This module provides a simplified API that encapsulates all component
//! wiring and configuration, following the Facade pattern.
//!
//! # Example
//!
//! ```
//! use geogate::cache::StaticSource;
//! use geogate::config::ConfigFile;
//! use geogate::coord::GeoPoint;
//! use geogate::location::ManualLocationProvider;
//! use geogate::service::GeoGateService;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = GeoGateService::new(
//!     StaticSource::new("latitude,longitude\n40.7128,-74.0060\n"),
//!     ManualLocationProvider::new(GeoPoint::new(40.7129, -74.0060), 5.0),
//!     &ConfigFile::default(),
//! )
//! .unwrap();
//!
//! let nearby = service.nearby(GeoPoint::new(40.7128, -74.0060), None, None).await.unwrap();
//! assert_eq!(nearby.len(), 1);
//!
//! let check = service.verify(nearby[0].point(), None).await.unwrap();
//! assert!(check.accepted);
//! # });
//! ```

mod error;
mod facade;

pub use error::ServiceError;
pub use facade::GeoGateService;
