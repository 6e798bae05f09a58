//! `geogate distance` - great-circle distance between two points.

use clap::Args;
use geogate::coord::{calculate_distance, GeoPoint};

use super::common::parse_point;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct DistanceArgs {
    /// Start point as LAT,LON
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    from: GeoPoint,

    /// End point as LAT,LON
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    to: GeoPoint,
}

pub fn run(args: DistanceArgs) -> Result<(), CliError> {
    let km = calculate_distance(
        args.from.latitude,
        args.from.longitude,
        args.to.latitude,
        args.to.longitude,
    );

    println!("From: {}", args.from);
    println!("To:   {}", args.to);
    if km < 1.0 {
        println!("Distance: {:.1} m", km * 1000.0);
    } else {
        println!("Distance: {:.3} km", km);
    }
    Ok(())
}
