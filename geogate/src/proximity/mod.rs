//! Proximity gate for report submission.
//!
//! Before a report about an asset is created, the reporter must be within a
//! threshold distance of it (50 m by default, inclusive). The gate combines
//! a caller-supplied candidate fix, or a freshly acquired high-accuracy fix,
//! with the asset's coordinates and the haversine distance.

mod config;
mod gate;
mod result;

pub use config::{
    ProximityConfig, DEFAULT_EPSILON_DEGREES, DEFAULT_MAX_CANDIDATE_AGE, DEFAULT_THRESHOLD_METERS,
};
pub use gate::{ProximityGate, SubmittedReport};
pub use result::{ProximityError, ProximityResult};
