//! Acquisition and watch configuration

use std::time::Duration;

use super::fix::FixRequest;

/// Default single-shot timeout (8 seconds).
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(8);

/// Default oldest acceptable single-shot fix (10 minutes).
pub const DEFAULT_ACQUIRE_MAX_AGE: Duration = Duration::from_secs(600);

/// Default timeout between watch deliveries (10 seconds).
pub const DEFAULT_WATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default oldest acceptable watch fix (1 minute).
pub const DEFAULT_WATCH_MAX_AGE: Duration = Duration::from_secs(60);

/// Configuration for [`LocationService::acquire`](super::LocationService::acquire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireConfig {
    /// Bound on each attempt
    pub timeout: Duration,
    /// Oldest acceptable fix, relative to the start of the attempt
    pub max_age: Duration,
    /// Request the accurate tier on the first attempt
    pub high_accuracy: bool,
    /// On a high-accuracy timeout, retry once at low accuracy
    pub fallback_on_timeout: bool,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ACQUIRE_TIMEOUT,
            max_age: DEFAULT_ACQUIRE_MAX_AGE,
            high_accuracy: false,
            fallback_on_timeout: true,
        }
    }
}

impl AcquireConfig {
    /// A high-accuracy request that only accepts a measurement taken after
    /// the request starts, with no low-accuracy fallback.
    pub fn fresh_high_accuracy(timeout: Duration) -> Self {
        Self {
            timeout,
            max_age: Duration::ZERO,
            high_accuracy: true,
            fallback_on_timeout: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = high_accuracy;
        self
    }

    pub fn with_fallback_on_timeout(mut self, fallback: bool) -> Self {
        self.fallback_on_timeout = fallback;
        self
    }

    /// Request for the first attempt.
    pub(crate) fn request(&self) -> FixRequest {
        FixRequest {
            timeout: self.timeout,
            max_age: self.max_age,
            high_accuracy: self.high_accuracy,
        }
    }
}

/// Configuration for [`LocationService::watch`](super::LocationService::watch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    /// Longest wait between deliveries before a timeout is reported
    pub timeout: Duration,
    /// Oldest acceptable fix at delivery time
    pub max_age: Duration,
    pub high_accuracy: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WATCH_TIMEOUT,
            max_age: DEFAULT_WATCH_MAX_AGE,
            high_accuracy: true,
        }
    }
}

impl WatchConfig {
    pub(crate) fn request(&self) -> FixRequest {
        FixRequest {
            timeout: self.timeout,
            max_age: self.max_age,
            high_accuracy: self.high_accuracy,
        }
    }
}
