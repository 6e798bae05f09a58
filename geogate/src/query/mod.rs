//! Spatial queries over the cached asset snapshot.
//!
//! Queries are linear scans over an immutable snapshot. The dataset is a
//! single city's worth of assets, so a scan per request is cheap and needs
//! no index maintenance.
//!
//! A radius query is answered in two passes: a coarse bounding box from
//! [`bounds_around`] to cut the candidate set, then an exact haversine
//! filter. The coarse pass over-fetches (`2 × limit`) because corner points
//! of the box fall outside the circle.

use crate::asset::AssetRecord;
use crate::cache::{AssetCache, AssetSource, CacheError};
use crate::coord::{bounds_around, calculate_distance, BoundingBox, CoordError, GeoPoint};

/// Maximum records returned when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 500;

/// Radius used when the caller gives none, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;

/// Errors from spatial queries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// The snapshot could not be loaded.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Radius was negative, NaN or infinite.
    #[error("Invalid radius: {0} km")]
    InvalidRadius(f64),

    /// The derived bounding box or a query coordinate was invalid.
    #[error("Invalid query area: {0}")]
    InvalidArea(#[from] CoordError),
}

/// Records inside `bounds` (edges inclusive), in snapshot order, at most `limit`.
pub fn filter_by_bounds(records: &[AssetRecord], bounds: &BoundingBox, limit: usize) -> Vec<AssetRecord> {
    records
        .iter()
        .filter(|r| bounds.contains(r.latitude(), r.longitude()))
        .take(limit)
        .copied()
        .collect()
}

/// Records within `radius_km` of `center` by great-circle distance.
///
/// Applies the coarse box with `2 × limit`, then the exact distance filter,
/// then truncates to `limit`.
pub fn filter_by_radius(
    records: &[AssetRecord],
    center: GeoPoint,
    radius_km: f64,
    limit: usize,
) -> Result<Vec<AssetRecord>, QueryError> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(QueryError::InvalidRadius(radius_km));
    }

    let bounds = bounds_around(center, radius_km)?;
    let candidates = filter_by_bounds(records, &bounds, limit.saturating_mul(2));

    Ok(candidates
        .into_iter()
        .filter(|r| {
            calculate_distance(center.latitude, center.longitude, r.latitude(), r.longitude())
                <= radius_km
        })
        .take(limit)
        .collect())
}

/// Query engine backed by an [`AssetCache`].
///
/// Each query loads (or reuses) the snapshot and scans it; the engine holds
/// no state of its own.
pub struct AssetQueryEngine<S: AssetSource> {
    cache: AssetCache<S>,
}

impl<S: AssetSource> Clone for AssetQueryEngine<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: AssetSource> AssetQueryEngine<S> {
    pub fn new(cache: AssetCache<S>) -> Self {
        Self { cache }
    }

    /// The cache backing this engine.
    pub fn cache(&self) -> &AssetCache<S> {
        &self.cache
    }

    /// Records inside `bounds`, at most `limit` (default [`DEFAULT_LIMIT`]).
    pub async fn by_bounds(
        &self,
        bounds: &BoundingBox,
        limit: Option<usize>,
    ) -> Result<Vec<AssetRecord>, QueryError> {
        let snapshot = self.cache.get_or_load().await?;
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let results = filter_by_bounds(&snapshot, bounds, limit);

        tracing::debug!(
            north = bounds.north(),
            south = bounds.south(),
            east = bounds.east(),
            west = bounds.west(),
            limit,
            results = results.len(),
            "Bounding box query"
        );

        Ok(results)
    }

    /// Records within `radius_km` (default [`DEFAULT_RADIUS_KM`]) of `center`.
    pub async fn by_radius(
        &self,
        center: GeoPoint,
        radius_km: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<AssetRecord>, QueryError> {
        let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        let snapshot = self.cache.get_or_load().await?;
        let results = filter_by_radius(&snapshot, center, radius_km, limit)?;

        tracing::debug!(
            center = %center,
            radius_km,
            limit,
            results = results.len(),
            "Radius query"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StaticSource;
    use crate::coord::{AdmissibleRegion, KM_PER_DEGREE};

    fn record(lat: f64, lon: f64) -> AssetRecord {
        AssetRecord::new(lat, lon, &AdmissibleRegion::default()).unwrap()
    }

    /// Point `km` due north of `center` on the haversine sphere.
    fn north_of(center: GeoPoint, km: f64) -> AssetRecord {
        let delta = km / crate::coord::EARTH_RADIUS_KM * 180.0 / std::f64::consts::PI;
        record(center.latitude + delta, center.longitude)
    }

    #[test]
    fn test_filter_by_bounds_inclusive_and_ordered() {
        let records = vec![
            record(40.5, -74.5),
            record(40.9, -73.1),
            record(40.2, -74.0),
            record(40.6, -74.6),
        ];
        let bounds = BoundingBox::new(40.6, 40.2, -74.0, -74.6).unwrap();

        let results = filter_by_bounds(&records, &bounds, 10);
        assert_eq!(results, vec![records[0], records[2], records[3]]);
    }

    #[test]
    fn test_filter_by_bounds_limit_is_prefix() {
        let records: Vec<_> = (0..10).map(|i| record(40.5, -74.0 + i as f64 * 0.01)).collect();
        let bounds = BoundingBox::new(41.0, 40.0, -73.0, -75.0).unwrap();

        let results = filter_by_bounds(&records, &bounds, 3);
        assert_eq!(results, records[..3].to_vec());

        assert!(filter_by_bounds(&records, &bounds, 0).is_empty());
    }

    #[test]
    fn test_radius_keeps_near_drops_far_inside_box() {
        let center = GeoPoint::new(40.7128, -74.0060);
        let near = north_of(center, 0.5);

        // Near the north-east corner of the coarse 1 km box: inside the box,
        // but well outside the circle.
        let lat_delta = 1.0 / KM_PER_DEGREE;
        let lon_delta = 1.0 / (KM_PER_DEGREE * center.latitude.to_radians().cos());
        let far = record(center.latitude + lat_delta * 0.99, center.longitude + lon_delta * 0.99);

        let bounds = bounds_around(center, 1.0).unwrap();
        assert!(bounds.contains(far.latitude(), far.longitude()));
        let far_km = calculate_distance(center.latitude, center.longitude, far.latitude(), far.longitude());
        assert!(far_km > 1.3, "got {}", far_km);

        let results = filter_by_radius(&[near, far], center, 1.0, 10).unwrap();
        assert_eq!(results, vec![near]);
    }

    #[test]
    fn test_radius_excludes_record_beyond_box() {
        let center = GeoPoint::new(40.7128, -74.0060);
        let results = filter_by_radius(&[north_of(center, 1.5)], center, 1.0, 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_radius_results_within_distance() {
        let center = GeoPoint::new(40.75, -73.98);
        let records: Vec<_> = (0..50)
            .map(|i| record(40.74 + i as f64 * 0.0005, -73.99 + i as f64 * 0.0005))
            .collect();

        let results = filter_by_radius(&records, center, 1.2, 500).unwrap();
        assert!(!results.is_empty());
        for r in &results {
            let d = calculate_distance(center.latitude, center.longitude, r.latitude(), r.longitude());
            assert!(d <= 1.2);
        }
    }

    #[test]
    fn test_radius_zero_matches_exact_point() {
        let center = GeoPoint::new(40.7, -74.0);
        let results = filter_by_radius(&[record(40.7, -74.0), record(40.7001, -74.0)], center, 0.0, 10).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_radius_rejects_invalid() {
        let center = GeoPoint::new(40.7, -74.0);
        assert!(matches!(
            filter_by_radius(&[], center, -1.0, 10),
            Err(QueryError::InvalidRadius(_))
        ));
        assert!(matches!(
            filter_by_radius(&[], center, f64::NAN, 10),
            Err(QueryError::InvalidRadius(_))
        ));
        assert!(matches!(
            filter_by_radius(&[], center, f64::INFINITY, 10),
            Err(QueryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_radius_limit_truncates() {
        let center = GeoPoint::new(40.7, -74.0);
        let records: Vec<_> = (0..20).map(|_| record(40.7, -74.0)).collect();
        let results = filter_by_radius(&records, center, 0.5, 5).unwrap();
        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn test_engine_defaults() {
        let csv = "latitude,longitude\n40.7,-74.0\n40.71,-74.0\n40.9,-73.5\n";
        let cache = AssetCache::new(StaticSource::new(csv), AdmissibleRegion::default());
        let engine = AssetQueryEngine::new(cache);

        // 40.71 is ~1.1 km away, inside the default 2 km
        let results = engine.by_radius(GeoPoint::new(40.7, -74.0), None, None).await.unwrap();
        assert_eq!(results.len(), 2);

        let bounds = BoundingBox::new(41.0, 40.0, -73.0, -75.0).unwrap();
        let results = engine.by_bounds(&bounds, Some(1)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].latitude(), 40.7);
    }

    #[tokio::test]
    async fn test_engine_surfaces_load_errors() {
        let cache = AssetCache::new(StaticSource::new(""), AdmissibleRegion::default());
        let engine = AssetQueryEngine::new(cache);

        let bounds = BoundingBox::new(41.0, 40.0, -73.0, -75.0).unwrap();
        let result = engine.by_bounds(&bounds, None).await;
        assert!(matches!(result, Err(QueryError::Cache(_))));
    }
}
