//! Cache statistics for monitoring and debugging.

use crate::asset::ParseStats;

/// Point-in-time statistics for an [`AssetCache`](super::AssetCache).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    /// Total `get_or_load` calls
    pub total_requests: u64,
    /// Calls that joined a load already in flight
    pub coalesced_requests: u64,
    /// Fetch-and-parse tasks started
    pub loads_started: u64,
    /// Loads that ended in an error
    pub loads_failed: u64,
    /// Number of invalidations so far
    pub epoch: u64,
    /// Row counts from the most recent successful parse
    pub last_parse: Option<ParseStats>,
}

impl CacheStats {
    /// Fraction of requests that were coalesced into an existing load.
    ///
    /// Returns 0.0 if no requests have been made.
    pub fn coalescing_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.coalesced_requests as f64 / self.total_requests as f64
        }
    }

    /// Fraction of started loads that failed.
    pub fn failure_rate(&self) -> f64 {
        if self.loads_started == 0 {
            0.0
        } else {
            self.loads_failed as f64 / self.loads_started as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratios_with_no_activity() {
        let stats = CacheStats::default();
        assert_eq!(stats.coalescing_ratio(), 0.0);
        assert_eq!(stats.failure_rate(), 0.0);
    }

    #[test]
    fn test_coalescing_ratio() {
        let stats = CacheStats {
            total_requests: 10,
            coalesced_requests: 8,
            loads_started: 2,
            loads_failed: 1,
            ..Default::default()
        };
        assert!((stats.coalescing_ratio() - 0.8).abs() < 0.001);
        assert!((stats.failure_rate() - 0.5).abs() < 0.001);
    }
}
