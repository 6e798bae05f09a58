//! Deterministic provider that replays a fixed script of outcomes.
//!
//! Used by simulations and tests to exercise timeout, fallback and
//! cancellation paths without a real device.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use futures::StreamExt;

use super::error::LocationError;
use super::fix::{FixRequest, LocationFix};
use super::provider::{FixStream, LocationProvider};

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Answer with a fix measured `age` before it is delivered.
    Fix {
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        age: Duration,
    },
    /// Answer with an error.
    Fail(LocationError),
    /// Never answer.
    Hang,
}

impl ScriptStep {
    /// A fix measured at delivery time.
    pub fn fix(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self::aged_fix(latitude, longitude, accuracy, Duration::ZERO)
    }

    pub fn aged_fix(latitude: f64, longitude: f64, accuracy: f64, age: Duration) -> Self {
        ScriptStep::Fix {
            latitude,
            longitude,
            accuracy,
            age,
        }
    }

    /// The outcome, or `None` for a step that never answers.
    fn resolve(self) -> Option<Result<LocationFix, LocationError>> {
        match self {
            ScriptStep::Fix {
                latitude,
                longitude,
                accuracy,
                age,
            } => Some(Ok(LocationFix::aged(latitude, longitude, accuracy, age))),
            ScriptStep::Fail(e) => Some(Err(e)),
            ScriptStep::Hang => None,
        }
    }
}

/// Provider that answers single-shot requests from a queue and replays a
/// watch script for every subscription.
///
/// Single-shot requests beyond the end of the script fail with
/// [`LocationError::PositionUnavailable`].
pub struct ScriptedLocationProvider {
    steps: Mutex<VecDeque<ScriptStep>>,
    requests: Mutex<Vec<FixRequest>>,
    watch_steps: Vec<ScriptStep>,
    watch_interval: Duration,
}

impl ScriptedLocationProvider {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
            watch_steps: Vec::new(),
            watch_interval: Duration::ZERO,
        }
    }

    /// Sets the steps each watch subscription replays, `interval` apart.
    pub fn with_watch_script(mut self, steps: Vec<ScriptStep>, interval: Duration) -> Self {
        self.watch_steps = steps;
        self.watch_interval = interval;
        self
    }

    /// Single-shot requests received so far, in order.
    pub fn requests(&self) -> Vec<FixRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of single-shot steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl LocationProvider for ScriptedLocationProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn current_fix(&self, request: FixRequest) -> Result<LocationFix, LocationError> {
        let step = {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);
            self.steps
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
        };

        let Some(step) = step else {
            return Err(LocationError::PositionUnavailable(
                "location script exhausted".to_string(),
            ));
        };

        match step.resolve() {
            Some(outcome) => outcome,
            None => futures::future::pending().await,
        }
    }

    fn watch(&self, _request: FixRequest) -> FixStream {
        let steps: VecDeque<ScriptStep> = self.watch_steps.iter().cloned().collect();
        let interval = self.watch_interval;

        futures::stream::unfold(steps, move |mut steps| async move {
            let step = steps.pop_front()?;
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
            match step.resolve() {
                Some(outcome) => Some((outcome, steps)),
                None => futures::future::pending().await,
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FixRequest {
        FixRequest {
            timeout: Duration::from_secs(1),
            max_age: Duration::ZERO,
            high_accuracy: true,
        }
    }

    #[tokio::test]
    async fn test_replays_steps_in_order() {
        let provider = ScriptedLocationProvider::new(vec![
            ScriptStep::Fail(LocationError::Unsupported),
            ScriptStep::fix(40.7, -74.0, 8.0),
        ]);

        assert_eq!(provider.current_fix(request()).await, Err(LocationError::Unsupported));
        let fix = provider.current_fix(request()).await.unwrap();
        assert_eq!(fix.accuracy, 8.0);
        assert_eq!(provider.remaining(), 0);

        assert!(matches!(
            provider.current_fix(request()).await,
            Err(LocationError::PositionUnavailable(_))
        ));
        assert_eq!(provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_aged_fix_timestamp() {
        let provider =
            ScriptedLocationProvider::new(vec![ScriptStep::aged_fix(40.7, -74.0, 8.0, Duration::from_secs(5))]);
        let fix = provider.current_fix(request()).await.unwrap();
        assert!(fix.age() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_each_watch_replays_full_script() {
        let provider = ScriptedLocationProvider::new(vec![]).with_watch_script(
            vec![ScriptStep::fix(40.7, -74.0, 5.0), ScriptStep::fix(40.8, -74.0, 5.0)],
            Duration::ZERO,
        );

        let first: Vec<_> = provider.watch(request()).collect().await;
        let second: Vec<_> = provider.watch(request()).collect().await;
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }
}
