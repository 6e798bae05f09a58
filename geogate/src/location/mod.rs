//! Device location acquisition.
//!
//! Wraps a [`LocationProvider`] with the acquisition protocol used by the
//! proximity gate:
//!
//! - [`LocationService::acquire`] - single-shot fix, bounded by a timeout,
//!   rejecting stale fixes, with one low-accuracy retry on a high-accuracy
//!   timeout
//! - [`LocationService::watch`] - continuous updates delivered to a callback
//!   until the returned [`WatchSubscription`] is cancelled
//!
//! # Providers
//!
//! - [`ManualLocationProvider`] - user-entered coordinates
//! - [`ScriptedLocationProvider`] - deterministic replay for simulations and tests

mod config;
mod error;
mod fix;
mod manual;
mod provider;
mod scripted;
mod service;

pub use config::{
    AcquireConfig, WatchConfig, DEFAULT_ACQUIRE_MAX_AGE, DEFAULT_ACQUIRE_TIMEOUT,
    DEFAULT_WATCH_MAX_AGE, DEFAULT_WATCH_TIMEOUT,
};
pub use error::LocationError;
pub use fix::{FixRequest, LocationFix};
pub use manual::{ManualLocationProvider, ManualPosition};
pub use provider::{FixStream, LocationProvider};
pub use scripted::{ScriptStep, ScriptedLocationProvider};
pub use service::{LocationService, WatchSubscription};
