//! Device location provider trait.

use std::future::Future;

use futures::stream::BoxStream;

use super::error::LocationError;
use super::fix::{FixRequest, LocationFix};

/// Stream of watch deliveries from a provider.
pub type FixStream = BoxStream<'static, Result<LocationFix, LocationError>>;

/// Trait for device positioning back-ends.
///
/// Providers report failures as [`LocationError`] variants; the service
/// layer enforces timeouts and freshness, so providers may ignore
/// `timeout` and `max_age` if they cannot honour them.
pub trait LocationProvider: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Single-shot fix.
    fn current_fix(
        &self,
        request: FixRequest,
    ) -> impl Future<Output = Result<LocationFix, LocationError>> + Send;

    /// Continuous updates. The stream ends when the provider has no more.
    fn watch(&self, request: FixRequest) -> FixStream;
}
