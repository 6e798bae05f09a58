//! Integration tests for loading asset exports from disk.
//!
//! These tests verify the complete load flow including:
//! - Reading a CSV export from the filesystem
//! - Coalescing concurrent queries onto a single load
//! - Reloading after the file changes and the cache is invalidated
//!
//! Run with: `cargo test --test cache_integration`

use std::fs;
use std::sync::Arc;

use futures::future::join_all;
use tempfile::TempDir;

use geogate::cache::{AssetCache, CacheError, FileSource, SourceError};
use geogate::coord::{AdmissibleRegion, BoundingBox, GeoPoint};
use geogate::query::{AssetQueryEngine, QueryError};

const HYDRANTS: &str = "\
UNITID,BOROUGH,LATITUDE,LONGITUDE
H-0001,MANHATTAN,40.7128,-74.0060
H-0002,MANHATTAN,40.7138,-74.0060
H-0003,\"MANHATTAN, LOWER\",40.7100,-74.0100
H-0004,MANHATTAN,40.7580,-73.9855
H-0005,BROOKLYN,not-a-number,-73.9442
H-0006,ELSEWHERE,34.0522,-118.2437
H-0007,SHORT
";

fn write_export(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("hydrants.csv");
    fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_file_export_loads_and_reports_drops() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, HYDRANTS);
    let cache = AssetCache::new(FileSource::new(&path), AdmissibleRegion::NEW_YORK);

    let snapshot = cache.get_or_load().await.unwrap();
    assert_eq!(snapshot.len(), 4);

    let stats = cache.stats();
    let parse = stats.last_parse.unwrap();
    assert_eq!(parse.rows, 7);
    assert_eq!(parse.accepted, 4);
    assert_eq!(parse.unparsable, 1);
    assert_eq!(parse.out_of_region, 1);
    assert_eq!(parse.short_rows, 1);
}

#[tokio::test]
async fn test_concurrent_queries_share_one_read() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, HYDRANTS);
    let engine = Arc::new(AssetQueryEngine::new(AssetCache::new(
        FileSource::new(&path),
        AdmissibleRegion::NEW_YORK,
    )));

    let tasks = (0..16).map(|i| {
        let engine = Arc::clone(&engine);
        async move {
            if i % 2 == 0 {
                engine
                    .by_radius(GeoPoint::new(40.7128, -74.0060), Some(1.0), None)
                    .await
            } else {
                let bounds = BoundingBox::new(40.8, 40.7, -73.9, -74.1).unwrap();
                engine.by_bounds(&bounds, None).await
            }
        }
    });
    let results = join_all(tasks).await;

    for (i, result) in results.into_iter().enumerate() {
        let records = result.unwrap();
        if i % 2 == 0 {
            assert_eq!(records.len(), 3, "radius query {}", i);
        } else {
            assert_eq!(records.len(), 4, "bounds query {}", i);
        }
    }

    let stats = engine.cache().stats();
    assert_eq!(stats.loads_started, 1);
    assert_eq!(stats.total_requests, 16);
}

#[tokio::test]
async fn test_invalidate_picks_up_new_export() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, HYDRANTS);
    let cache = AssetCache::new(FileSource::new(&path), AdmissibleRegion::NEW_YORK);

    assert_eq!(cache.get_or_load().await.unwrap().len(), 4);

    fs::write(&path, "LATITUDE,LONGITUDE\n40.5,-74.5\n").unwrap();
    // Still served from memory until invalidated
    assert_eq!(cache.get_or_load().await.unwrap().len(), 4);

    cache.invalidate();
    let reloaded = cache.get_or_load().await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].latitude(), 40.5);
}

#[tokio::test]
async fn test_missing_file_is_not_cached() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("later.csv");
    let engine = AssetQueryEngine::new(AssetCache::new(
        FileSource::new(&path),
        AdmissibleRegion::NEW_YORK,
    ));

    let err = engine
        .by_radius(GeoPoint::new(40.7128, -74.0060), None, None)
        .await
        .unwrap_err();
    match err {
        QueryError::Cache(CacheError::Fetch(source)) => {
            assert!(matches!(*source, SourceError::NotFound(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    fs::write(&path, HYDRANTS).unwrap();
    let records = engine
        .by_radius(GeoPoint::new(40.7128, -74.0060), None, None)
        .await
        .unwrap();
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn test_header_without_coordinates_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, "UNITID,BOROUGH\nH-1,QUEENS\n");
    let cache = AssetCache::new(FileSource::new(&path), AdmissibleRegion::NEW_YORK);

    let err = cache.get_or_load().await.unwrap_err();
    assert!(matches!(err, CacheError::Parse(_)));
    assert!(!cache.is_loaded());
}
