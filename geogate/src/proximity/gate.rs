//! Two-phase proximity check.
//!
//! A candidate fix supplied by the caller is only trusted if it looks like a
//! real, recent measurement. Otherwise the gate acquires a fresh
//! high-accuracy fix (no cached positions, no low-accuracy fallback) and
//! evaluates that instead.

use tracing::{debug, info};

use super::config::ProximityConfig;
use super::result::{ProximityError, ProximityResult};
use crate::coord::{distance_meters, validate_coordinates, GeoPoint};
use crate::location::{AcquireConfig, LocationFix, LocationProvider, LocationService};
use crate::report::{NewReport, ReportDraft, ReportSink};

/// Why a candidate fix was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reacquire {
    Missing,
    CoincidesWithTarget,
    TooOld,
}

/// A report accepted by the gate and created by the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedReport {
    /// Identifier assigned by the sink
    pub id: String,
    pub report: NewReport,
    pub proximity: ProximityResult,
}

/// Verifies that a reporter is near a target asset.
pub struct ProximityGate<P: LocationProvider> {
    location: LocationService<P>,
    config: ProximityConfig,
}

impl<P: LocationProvider> ProximityGate<P> {
    pub fn new(location: LocationService<P>, config: ProximityConfig) -> Self {
        Self { location, config }
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    pub fn location(&self) -> &LocationService<P> {
        &self.location
    }

    /// Checks the reporter's distance to `target`.
    ///
    /// A fresh fix is acquired when `candidate` is absent, within epsilon of
    /// the target on both axes, or older than the configured age. A rejected
    /// check is `Ok` with `accepted == false`; only a failure to obtain a
    /// position is an error.
    pub async fn verify(
        &self,
        target: GeoPoint,
        candidate: Option<LocationFix>,
    ) -> Result<ProximityResult, ProximityError> {
        validate_coordinates(target.latitude, target.longitude)?;

        let fix = match self.usable_candidate(target, candidate) {
            Ok(fix) => fix,
            Err(reason) => {
                debug!(?reason, "Acquiring fresh high-accuracy fix");
                self.location
                    .acquire(&AcquireConfig::fresh_high_accuracy(self.config.fix_timeout))
                    .await
                    .map_err(ProximityError::LocationUnavailable)?
            }
        };

        let result = ProximityResult::evaluate(
            distance_meters(fix.point(), target),
            self.config.threshold_meters,
        );

        info!(
            target = %target,
            distance_m = format!("{:.1}", result.distance_meters),
            threshold_m = result.threshold_meters,
            accuracy_m = format!("{:.0}", fix.accuracy),
            accepted = result.accepted,
            "Proximity check"
        );

        Ok(result)
    }

    /// Verifies proximity, then creates the report at the target's position.
    ///
    /// The sink receives the asset's coordinates, never the reporter's.
    pub async fn submit_report<K: ReportSink>(
        &self,
        target: GeoPoint,
        candidate: Option<LocationFix>,
        draft: ReportDraft,
        sink: &K,
    ) -> Result<SubmittedReport, ProximityError> {
        let proximity = self.verify(target, candidate).await?.require_accepted()?;
        let report = NewReport::new(target, draft)?;

        let id = sink.create_report(report.clone()).await?;
        info!(id = %id, kind = %report.kind, target = %target, "Report created");

        Ok(SubmittedReport {
            id,
            report,
            proximity,
        })
    }

    /// Returns the candidate if it can be evaluated as-is.
    fn usable_candidate(
        &self,
        target: GeoPoint,
        candidate: Option<LocationFix>,
    ) -> Result<LocationFix, Reacquire> {
        let fix = candidate.ok_or(Reacquire::Missing)?;

        let epsilon = self.config.epsilon_degrees;
        if (fix.latitude - target.latitude).abs() < epsilon
            && (fix.longitude - target.longitude).abs() < epsilon
        {
            return Err(Reacquire::CoincidesWithTarget);
        }

        if fix.age() > self.config.max_candidate_age {
            return Err(Reacquire::TooOld);
        }

        Ok(fix)
    }
}
