//! `geogate verify` - proximity check against an asset.
//!
//! The "device" is a manual location provider seeded from `--at`, so the
//! command exercises the same gate a field client goes through. With
//! `--kind` the verified report is submitted to an in-memory sink and its
//! identifier printed.

use clap::Args;
use geogate::config::ConfigFile;
use geogate::coord::GeoPoint;
use geogate::location::ManualLocationProvider;
use geogate::proximity::ProximityResult;
use geogate::report::{MemoryReportSink, ReportDraft, ReportKind};
use serde_json::json;

use super::common::{build_service, parse_point};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Asset position as LAT,LON
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    target: GeoPoint,

    /// Reporter position as LAT,LON (without it no position is available)
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    at: Option<GeoPoint>,

    /// Claimed accuracy of --at in meters
    #[arg(long, default_value = "10")]
    accuracy: f64,

    /// Override the acceptance threshold in meters
    #[arg(long)]
    threshold: Option<f64>,

    /// Submit a report of this kind after a successful check
    #[arg(long)]
    kind: Option<ReportKind>,

    /// Report description (used with --kind)
    #[arg(long, default_value = "")]
    description: String,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(
    args: VerifyArgs,
    mut config: ConfigFile,
    source: Option<&str>,
) -> Result<(), CliError> {
    if let Some(threshold) = args.threshold {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(CliError::InvalidArgument(format!(
                "Threshold must be a non-negative number of meters, got {}",
                threshold
            )));
        }
        config.proximity.threshold_meters = threshold;
    }

    let device = match args.at {
        Some(point) => ManualLocationProvider::new(point, args.accuracy),
        None => ManualLocationProvider::unset(),
    };
    let service = build_service(&config, source, device)?;

    let Some(kind) = args.kind else {
        let result = service.verify(args.target, None).await?;
        return print_result(&result, None, args.json);
    };

    let sink = MemoryReportSink::new();
    let submitted = service
        .submit_report(
            args.target,
            None,
            ReportDraft::new(kind, args.description),
            &sink,
        )
        .await?;

    print_result(&submitted.proximity, Some(submitted.id.as_str()), args.json)
}

fn print_result(
    result: &ProximityResult,
    report_id: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    if json {
        let value = json!({
            "accepted": result.accepted,
            "distance_meters": result.distance_meters,
            "threshold_meters": result.threshold_meters,
            "report_id": report_id,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let verdict = if result.accepted { "ACCEPTED" } else { "REJECTED" };
    println!(
        "{}: {:.1} m from the asset (threshold {:.0} m)",
        verdict, result.distance_meters, result.threshold_meters
    );
    if let Some(id) = report_id {
        println!("Report created: {}", id);
    }
    Ok(())
}
