//! Single-flight cache for the asset dataset.
//!
//! The dataset is fetched from an [`AssetSource`], parsed once, and shared as
//! an immutable snapshot. Concurrent first calls coalesce into one load.

mod single_flight;
mod source;
mod stats;

pub use single_flight::{AssetCache, AssetSnapshot, CacheError};
pub use source::{
    AssetSource, ConfiguredSource, FileSource, HttpSource, SourceError, StaticSource,
    DEFAULT_FETCH_TIMEOUT,
};
pub use stats::CacheStats;
