//! GeoGate service facade implementation.

use super::error::ServiceError;
use crate::asset::AssetRecord;
use crate::cache::{AssetCache, AssetSource, CacheStats, ConfiguredSource};
use crate::config::ConfigFile;
use crate::coord::{calculate_distance, BoundingBox, CoordError, GeoPoint};
use crate::location::{AcquireConfig, LocationFix, LocationProvider, LocationService};
use crate::proximity::{ProximityGate, ProximityResult, SubmittedReport};
use crate::query::AssetQueryEngine;
use crate::report::{ReportDraft, ReportSink};
use tracing::info;

/// High-level facade for GeoGate operations.
///
/// Wires configuration, asset source, cache, query engine, location service
/// and proximity gate together.
///
/// # Example
///
/// ```ignore
/// use geogate::config::ConfigFile;
/// use geogate::coord::GeoPoint;
/// use geogate::location::ManualLocationProvider;
/// use geogate::service::GeoGateService;
///
/// let config = ConfigFile::load()?;
/// let device = ManualLocationProvider::new(GeoPoint::new(40.7128, -74.0060), 5.0);
/// let service = GeoGateService::from_config(&config, None, device)?;
///
/// let nearby = service.nearby(GeoPoint::new(40.7128, -74.0060), None, None).await?;
/// ```
pub struct GeoGateService<S: AssetSource, P: LocationProvider> {
    engine: AssetQueryEngine<S>,
    gate: ProximityGate<P>,
    acquire: AcquireConfig,
    default_limit: usize,
    default_radius_km: f64,
}

impl<P: LocationProvider> GeoGateService<ConfiguredSource, P> {
    /// Create a service whose asset source comes from `source` if given,
    /// otherwise from the `[source]` section of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NoSource`] if neither names a source.
    pub fn from_config(
        config: &ConfigFile,
        source: Option<&str>,
        provider: P,
    ) -> Result<Self, ServiceError> {
        let location = source
            .map(str::to_string)
            .or_else(|| config.source.location())
            .ok_or(ServiceError::NoSource)?;
        let source = ConfiguredSource::from_location(&location, config.source.timeout())?;

        Self::new(source, provider, config)
    }
}

impl<S: AssetSource, P: LocationProvider> GeoGateService<S, P> {
    /// Create a service over an explicit source and location provider.
    pub fn new(source: S, provider: P, config: &ConfigFile) -> Result<Self, ServiceError> {
        let region = config
            .region
            .to_region()
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

        info!(
            source = %source.describe(),
            location = provider.name(),
            region = format!(
                "{}..{}, {}..{}",
                region.min_lat, region.max_lat, region.min_lon, region.max_lon
            ),
            "GeoGate service created"
        );

        let engine = AssetQueryEngine::new(AssetCache::new(source, region));
        let gate = ProximityGate::new(
            LocationService::new(provider),
            config.proximity.proximity_config(&config.location),
        );

        Ok(Self {
            engine,
            gate,
            acquire: config.location.acquire_config(),
            default_limit: config.query.default_limit,
            default_radius_km: config.query.default_radius_km,
        })
    }

    /// Assets within `radius_km` of `center`, using configured defaults for
    /// missing arguments.
    pub async fn nearby(
        &self,
        center: GeoPoint,
        radius_km: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<AssetRecord>, ServiceError> {
        let center = checked(center)?;
        let results = self
            .engine
            .by_radius(
                center,
                Some(radius_km.unwrap_or(self.default_radius_km)),
                Some(limit.unwrap_or(self.default_limit)),
            )
            .await?;
        Ok(results)
    }

    /// Assets inside `bounds`.
    pub async fn within_bounds(
        &self,
        bounds: &BoundingBox,
        limit: Option<usize>,
    ) -> Result<Vec<AssetRecord>, ServiceError> {
        let results = self
            .engine
            .by_bounds(bounds, Some(limit.unwrap_or(self.default_limit)))
            .await?;
        Ok(results)
    }

    /// Great-circle distance between two points in kilometers.
    pub fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> Result<f64, ServiceError> {
        let from = checked(from)?;
        let to = checked(to)?;
        Ok(calculate_distance(
            from.latitude,
            from.longitude,
            to.latitude,
            to.longitude,
        ))
    }

    /// Single-shot device fix using the configured acquisition settings.
    pub async fn acquire_location(&self) -> Result<LocationFix, ServiceError> {
        Ok(self.gate.location().acquire(&self.acquire).await?)
    }

    /// Proximity check of the reporter against `target`.
    pub async fn verify(
        &self,
        target: GeoPoint,
        candidate: Option<LocationFix>,
    ) -> Result<ProximityResult, ServiceError> {
        Ok(self.gate.verify(target, candidate).await?)
    }

    /// Verify proximity and create a report at `target`.
    pub async fn submit_report<K: ReportSink>(
        &self,
        target: GeoPoint,
        candidate: Option<LocationFix>,
        draft: ReportDraft,
        sink: &K,
    ) -> Result<SubmittedReport, ServiceError> {
        Ok(self
            .gate
            .submit_report(target, candidate, draft, sink)
            .await?)
    }

    /// Drop the cached dataset so the next query reloads the source.
    pub fn invalidate_cache(&self) {
        self.engine.cache().invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.engine.cache().stats()
    }

    pub fn log_stats(&self) {
        self.engine.cache().log_stats();
    }

    pub fn query_engine(&self) -> &AssetQueryEngine<S> {
        &self.engine
    }

    pub fn gate(&self) -> &ProximityGate<P> {
        &self.gate
    }
}

fn checked(point: GeoPoint) -> Result<GeoPoint, ServiceError> {
    GeoPoint::checked(point.latitude, point.longitude).map_err(|e| {
        let reason = match e {
            CoordError::InvalidLatitude(_) => "latitude must be between -90 and 90",
            CoordError::InvalidLongitude(_) => "longitude must be between -180 and 180",
            _ => "coordinates out of range",
        };
        ServiceError::InvalidCoordinates {
            lat: point.latitude,
            lon: point.longitude,
            reason: reason.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StaticSource;
    use crate::location::ManualLocationProvider;
    use crate::report::{MemoryReportSink, ReportKind};

    const CSV: &str = "UNITID,LATITUDE,LONGITUDE\nH1,40.7128,-74.0060\nH2,40.7138,-74.0060\nH3,40.7580,-73.9855\n";

    fn service_at(device: GeoPoint) -> GeoGateService<StaticSource, ManualLocationProvider> {
        GeoGateService::new(
            StaticSource::new(CSV),
            ManualLocationProvider::new(device, 5.0),
            &ConfigFile::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_nearby_uses_configured_defaults() {
        let service = service_at(GeoPoint::new(40.7128, -74.0060));
        let results = service
            .nearby(GeoPoint::new(40.7128, -74.0060), None, None)
            .await
            .unwrap();
        // Times Square (H3) is ~5 km away, outside the 2 km default
        assert_eq!(results.len(), 2);
        assert_eq!(service.cache_stats().loads_started, 1);
    }

    #[tokio::test]
    async fn test_nearby_rejects_bad_center() {
        let service = service_at(GeoPoint::new(40.7128, -74.0060));
        let result = service.nearby(GeoPoint::new(95.0, -74.0), None, None).await;
        assert!(matches!(result, Err(ServiceError::InvalidCoordinates { .. })));
    }

    #[tokio::test]
    async fn test_invalidate_reloads() {
        let service = service_at(GeoPoint::new(40.7128, -74.0060));
        let bounds = BoundingBox::new(41.0, 40.0, -73.0, -75.0).unwrap();

        service.within_bounds(&bounds, None).await.unwrap();
        service.invalidate_cache();
        service.within_bounds(&bounds, Some(1)).await.unwrap();

        let stats = service.cache_stats();
        assert_eq!(stats.loads_started, 2);
        assert_eq!(stats.epoch, 1);
    }

    #[tokio::test]
    async fn test_verify_with_manual_device() {
        // Device is ~111 m north of H1
        let service = service_at(GeoPoint::new(40.7138, -74.0060));
        let result = service
            .verify(GeoPoint::new(40.7128, -74.0060), None)
            .await
            .unwrap();
        assert!(!result.accepted);
        assert!(result.distance_meters > 100.0);

        // A supplied fix ~22 m from the target is used as-is
        let fix = service.acquire_location().await.unwrap();
        let result = service
            .verify(GeoPoint::new(40.7136, -74.0060), Some(fix))
            .await
            .unwrap();
        assert!(result.accepted);
    }

    #[tokio::test]
    async fn test_submit_report_through_facade() {
        let service = service_at(GeoPoint::new(40.71385, -74.0060));
        let sink = MemoryReportSink::new();
        let submitted = service
            .submit_report(
                GeoPoint::new(40.7138, -74.0060),
                None,
                ReportDraft::new(ReportKind::Hydrant, "open and spraying"),
                &sink,
            )
            .await
            .unwrap();
        assert_eq!(submitted.report.latitude, 40.7138);
        assert_eq!(sink.reports().len(), 1);
    }

    #[test]
    fn test_from_config_requires_source() {
        let result = GeoGateService::from_config(
            &ConfigFile::default(),
            None,
            ManualLocationProvider::unset(),
        );
        assert!(matches!(result, Err(ServiceError::NoSource)));

        let result = GeoGateService::from_config(
            &ConfigFile::default(),
            Some("data/hydrants.csv"),
            ManualLocationProvider::unset(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_distance_km() {
        let service = service_at(GeoPoint::new(40.7128, -74.0060));
        let d = service
            .distance_km(GeoPoint::new(40.0, -74.0), GeoPoint::new(41.0, -74.0))
            .unwrap();
        assert!((d - 111.19).abs() < 0.1);
        assert!(service
            .distance_km(GeoPoint::new(40.0, -181.0), GeoPoint::new(41.0, -74.0))
            .is_err());
    }
}
