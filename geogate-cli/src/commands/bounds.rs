//! `geogate bounds` - assets inside a bounding box.

use clap::Args;
use geogate::config::ConfigFile;
use geogate::coord::BoundingBox;

use super::common::{build_query_service, print_assets, AssetRow};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct BoundsArgs {
    /// Northern edge (max latitude)
    #[arg(long, allow_hyphen_values = true)]
    north: f64,

    /// Southern edge (min latitude)
    #[arg(long, allow_hyphen_values = true)]
    south: f64,

    /// Eastern edge (max longitude)
    #[arg(long, allow_hyphen_values = true)]
    east: f64,

    /// Western edge (min longitude)
    #[arg(long, allow_hyphen_values = true)]
    west: f64,

    /// Maximum number of results (default from [query] in config)
    #[arg(long)]
    limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: BoundsArgs, config: &ConfigFile, source: Option<&str>) -> Result<(), CliError> {
    let bounds = BoundingBox::new(args.north, args.south, args.east, args.west)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let service = build_query_service(config, source)?;

    let records = service.within_bounds(&bounds, args.limit).await?;
    let rows: Vec<AssetRow> = records
        .iter()
        .map(|record| AssetRow::new(record, None))
        .collect();

    print_assets(&rows, args.json)?;
    service.log_stats();
    Ok(())
}
