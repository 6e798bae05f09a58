//! Provider backed by user-entered coordinates.
//!
//! Every fix reports the entered position, timestamped at the moment of the
//! request. Watchers are notified whenever the position is changed.

use futures::StreamExt;
use tokio::sync::watch;

use super::error::LocationError;
use super::fix::{FixRequest, LocationFix};
use super::provider::{FixStream, LocationProvider};
use crate::coord::GeoPoint;

/// A manually entered position and its claimed accuracy in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualPosition {
    pub point: GeoPoint,
    pub accuracy: f64,
}

impl ManualPosition {
    fn to_fix(self) -> LocationFix {
        LocationFix::now(self.point.latitude, self.point.longitude, self.accuracy)
    }
}

/// Location provider for devices without positioning hardware.
pub struct ManualLocationProvider {
    position: watch::Sender<Option<ManualPosition>>,
}

impl Default for ManualLocationProvider {
    fn default() -> Self {
        Self::unset()
    }
}

impl ManualLocationProvider {
    /// Creates a provider that reports `point` with the given accuracy.
    pub fn new(point: GeoPoint, accuracy: f64) -> Self {
        let (position, _) = watch::channel(Some(ManualPosition { point, accuracy }));
        Self { position }
    }

    /// Creates a provider with no position; requests fail until one is set.
    pub fn unset() -> Self {
        let (position, _) = watch::channel(None);
        Self { position }
    }

    /// Replaces the reported position and notifies watchers.
    pub fn set(&self, point: GeoPoint, accuracy: f64) {
        self.position
            .send_replace(Some(ManualPosition { point, accuracy }));
    }

    /// Removes the position; subsequent requests fail.
    pub fn clear(&self) {
        self.position.send_replace(None);
    }

    pub fn position(&self) -> Option<ManualPosition> {
        *self.position.borrow()
    }
}

fn resolve(position: Option<ManualPosition>) -> Result<LocationFix, LocationError> {
    position
        .map(ManualPosition::to_fix)
        .ok_or_else(|| LocationError::PositionUnavailable("no manual position entered".to_string()))
}

impl LocationProvider for ManualLocationProvider {
    fn name(&self) -> &str {
        "manual"
    }

    async fn current_fix(&self, _request: FixRequest) -> Result<LocationFix, LocationError> {
        resolve(self.position())
    }

    fn watch(&self, _request: FixRequest) -> FixStream {
        let receiver = self.position.subscribe();

        // First delivery is the current position, then one per change. The
        // stream ends when the provider is dropped.
        futures::stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first {
                receiver.changed().await.ok()?;
            }
            let position = *receiver.borrow_and_update();
            Some((resolve(position), (receiver, false)))
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request() -> FixRequest {
        FixRequest {
            timeout: Duration::from_secs(1),
            max_age: Duration::ZERO,
            high_accuracy: true,
        }
    }

    #[tokio::test]
    async fn test_reports_entered_position() {
        let provider = ManualLocationProvider::new(GeoPoint::new(40.7, -74.0), 10.0);
        let fix = provider.current_fix(request()).await.unwrap();
        assert_eq!(fix.point(), GeoPoint::new(40.7, -74.0));
        assert_eq!(fix.accuracy, 10.0);
    }

    #[tokio::test]
    async fn test_unset_is_unavailable() {
        let provider = ManualLocationProvider::unset();
        assert!(matches!(
            provider.current_fix(request()).await,
            Err(LocationError::PositionUnavailable(_))
        ));

        provider.set(GeoPoint::new(40.1, -74.1), 3.0);
        assert!(provider.current_fix(request()).await.is_ok());

        provider.clear();
        assert!(provider.current_fix(request()).await.is_err());
    }

    #[tokio::test]
    async fn test_watch_sees_updates() {
        let provider = ManualLocationProvider::new(GeoPoint::new(40.7, -74.0), 10.0);
        let mut stream = provider.watch(request());

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.latitude, 40.7);

        provider.set(GeoPoint::new(40.8, -74.0), 10.0);
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.latitude, 40.8);

        drop(provider);
        assert!(stream.next().await.is_none());
    }
}
