//! `geogate nearby` - assets within a radius of a point.

use clap::Args;
use geogate::config::ConfigFile;
use geogate::coord::GeoPoint;

use super::common::{build_query_service, print_assets, AssetRow};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct NearbyArgs {
    /// Latitude of the centre in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the centre in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Search radius in kilometers (default from [query] in config)
    #[arg(long)]
    radius_km: Option<f64>,

    /// Maximum number of results (default from [query] in config)
    #[arg(long)]
    limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: NearbyArgs, config: &ConfigFile, source: Option<&str>) -> Result<(), CliError> {
    let service = build_query_service(config, source)?;
    let center = GeoPoint::new(args.lat, args.lon);

    let records = service.nearby(center, args.radius_km, args.limit).await?;
    let rows: Vec<AssetRow> = records
        .iter()
        .map(|record| AssetRow::new(record, Some(center)))
        .collect();

    print_assets(&rows, args.json)?;
    service.log_stats();
    Ok(())
}
