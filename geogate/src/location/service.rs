//! Location acquisition protocol.
//!
//! [`LocationService::acquire`] obtains a single fix with an optional
//! accuracy downgrade:
//!
//! ```text
//! attempt(config tier) ──ok──────────────────────────► fix
//!        │
//!        ├─ timeout, high accuracy, fallback enabled ─► attempt(low accuracy) ─► final
//!        │
//!        └─ any other failure ─────────────────────────► error
//! ```
//!
//! [`LocationService::watch`] runs a background task per subscription that
//! forwards provider updates to a callback until cancelled.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::{AcquireConfig, WatchConfig};
use super::error::LocationError;
use super::fix::{FixRequest, LocationFix};
use super::provider::LocationProvider;

/// Front end for a [`LocationProvider`].
///
/// Cloning shares the provider.
pub struct LocationService<P: LocationProvider> {
    provider: Arc<P>,
}

impl<P: LocationProvider> Clone for LocationService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: LocationProvider> LocationService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Creates a service over an already shared provider.
    pub fn from_shared(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Obtains a single fix.
    ///
    /// At most two provider calls are made, strictly one after the other. The
    /// second only happens when a high-accuracy attempt times out and
    /// `fallback_on_timeout` is set; its outcome is final.
    pub async fn acquire(&self, config: &AcquireConfig) -> Result<LocationFix, LocationError> {
        let request = config.request();

        match self.attempt(request).await {
            Err(LocationError::Timeout(_)) if config.high_accuracy && config.fallback_on_timeout => {
                info!(
                    provider = self.provider.name(),
                    timeout_ms = config.timeout.as_millis() as u64,
                    "High-accuracy fix timed out, retrying at low accuracy"
                );
                self.attempt(FixRequest {
                    high_accuracy: false,
                    ..request
                })
                .await
            }
            other => other,
        }
    }

    /// One provider call, bounded by the request timeout and checked for age.
    async fn attempt(&self, request: FixRequest) -> Result<LocationFix, LocationError> {
        let started = Instant::now();

        let fix = match tokio::time::timeout(request.timeout, self.provider.current_fix(request)).await
        {
            Ok(result) => result?,
            Err(_) => return Err(LocationError::Timeout(request.timeout)),
        };

        check_age(&fix, started, request.max_age)?;

        debug!(
            provider = self.provider.name(),
            high_accuracy = request.high_accuracy,
            lat = format!("{:.5}", fix.latitude),
            lon = format!("{:.5}", fix.longitude),
            accuracy_m = format!("{:.0}", fix.accuracy),
            "Acquired location fix"
        );

        Ok(fix)
    }

    /// Starts a continuous watch.
    ///
    /// Each provider update is passed to `callback`. If nothing arrives within
    /// `config.timeout` the callback receives [`LocationError::Timeout`] and
    /// the watch keeps going; fixes older than `config.max_age` are delivered
    /// as [`LocationError::StaleFix`]. The watch stops when the returned
    /// subscription is cancelled or dropped, or when the provider's stream
    /// ends.
    pub fn watch<F>(&self, config: WatchConfig, mut callback: F) -> WatchSubscription
    where
        F: FnMut(Result<LocationFix, LocationError>) + Send + 'static,
    {
        let cancellation = CancellationToken::new();
        let token = cancellation.clone();
        let mut stream = self.provider.watch(config.request());
        let provider = self.provider.name().to_string();

        let handle = tokio::spawn(async move {
            debug!(provider = %provider, "Location watch started");
            loop {
                tokio::select! {
                    biased;

                    _ = token.cancelled() => {
                        debug!(provider = %provider, "Location watch cancelled");
                        break;
                    }
                    next = tokio::time::timeout(config.timeout, stream.next()) => {
                        match next {
                            Ok(Some(Ok(fix))) => {
                                callback(check_age(&fix, Instant::now(), config.max_age).map(|_| fix));
                            }
                            Ok(Some(Err(e))) => callback(Err(e)),
                            Ok(None) => {
                                debug!(provider = %provider, "Location watch stream ended");
                                break;
                            }
                            Err(_) => callback(Err(LocationError::Timeout(config.timeout))),
                        }
                    }
                }
            }
        });

        WatchSubscription {
            cancellation,
            handle: Some(handle),
        }
    }
}

/// Rejects a fix taken more than `max_age` before `reference`.
fn check_age(fix: &LocationFix, reference: Instant, max_age: Duration) -> Result<(), LocationError> {
    let age = reference.saturating_duration_since(fix.timestamp);
    if age > max_age {
        return Err(LocationError::StaleFix { age, max_age });
    }
    Ok(())
}

/// Handle to a running watch.
///
/// Cancelling (or dropping) the handle stops only this subscription.
pub struct WatchSubscription {
    cancellation: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl WatchSubscription {
    /// Stops delivering updates. No callback runs after the watch task
    /// observes the cancellation.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Returns true while the watch task is still running and not cancelled.
    pub fn is_active(&self) -> bool {
        !self.cancellation.is_cancelled()
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancels the watch and waits for its task to exit.
    pub async fn stop(mut self) {
        self.cancellation.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
