//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`bounds`] - Assets inside a bounding box
//! - [`config`] - Configuration management (init, show, path)
//! - [`distance`] - Distance between two points
//! - [`nearby`] - Assets around a point
//! - [`verify`] - Proximity check and report submission

pub mod bounds;
pub mod common;
pub mod config;
pub mod distance;
pub mod nearby;
pub mod verify;
