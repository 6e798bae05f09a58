//! Infrastructure report types and the report sink seam.
//!
//! Storing reports is owned by an external service. This module defines what
//! is handed to it ([`NewReport`]) and the trait it implements
//! ([`ReportSink`]). Reports only reach a sink through
//! [`ProximityGate::submit_report`](crate::proximity::ProximityGate::submit_report),
//! after the reporter has been verified near the asset.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::coord::{validate_coordinates, CoordError, GeoPoint};

/// Kind of infrastructure problem being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Streetlight,
    Hydrant,
    Pothole,
    Sidewalk,
    Graffiti,
    Trash,
    Other,
}

impl ReportKind {
    /// All kinds, in display order.
    pub const ALL: [ReportKind; 7] = [
        ReportKind::Streetlight,
        ReportKind::Hydrant,
        ReportKind::Pothole,
        ReportKind::Sidewalk,
        ReportKind::Graffiti,
        ReportKind::Trash,
        ReportKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Streetlight => "streetlight",
            ReportKind::Hydrant => "hydrant",
            ReportKind::Pothole => "pothole",
            ReportKind::Sidewalk => "sidewalk",
            ReportKind::Graffiti => "graffiti",
            ReportKind::Trash => "trash",
            ReportKind::Other => "other",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown report kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown report type '{0}'. Valid types: streetlight, hydrant, pothole, sidewalk, graffiti, trash, other")]
pub struct UnknownReportKind(pub String);

impl FromStr for ReportKind {
    type Err = UnknownReportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownReportKind(s.to_string()))
    }
}

/// What the reporter entered, before a location is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub kind: ReportKind,
    pub description: String,
}

impl ReportDraft {
    pub fn new(kind: ReportKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

/// A report ready for creation, located at the target asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub description: String,
}

impl NewReport {
    /// Attaches `target` to `draft`. The description is trimmed.
    pub fn new(target: GeoPoint, draft: ReportDraft) -> Result<Self, CoordError> {
        validate_coordinates(target.latitude, target.longitude)?;
        Ok(Self {
            latitude: target.latitude,
            longitude: target.longitude,
            kind: draft.kind,
            description: draft.description.trim().to_string(),
        })
    }
}

/// Errors from a report sink.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReportSinkError {
    /// The sink refused the report.
    #[error("Report rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached.
    #[error("Report service unavailable: {0}")]
    Unavailable(String),
}

/// Destination for verified reports.
pub trait ReportSink: Send + Sync {
    /// Creates the report and returns the identifier assigned to it.
    fn create_report(
        &self,
        report: NewReport,
    ) -> impl Future<Output = Result<String, ReportSinkError>> + Send;
}

/// Sink that keeps reports in memory.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    reports: Mutex<Vec<NewReport>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports created so far.
    pub fn reports(&self) -> Vec<NewReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportSink for MemoryReportSink {
    async fn create_report(&self, report: NewReport) -> Result<String, ReportSinkError> {
        let mut reports = self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        reports.push(report);
        Ok(format!("report-{}", reports.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_case_insensitive() {
        assert_eq!("hydrant".parse::<ReportKind>().unwrap(), ReportKind::Hydrant);
        assert_eq!(" StreetLight ".parse::<ReportKind>().unwrap(), ReportKind::Streetlight);
        assert!("bridge".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.to_string().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_new_report_trims_and_validates() {
        let draft = ReportDraft::new(ReportKind::Pothole, "  deep one  ");
        let report = NewReport::new(GeoPoint::new(40.7, -74.0), draft.clone()).unwrap();
        assert_eq!(report.description, "deep one");
        assert_eq!(report.latitude, 40.7);

        assert!(NewReport::new(GeoPoint::new(95.0, -74.0), draft).is_err());
    }

    #[test]
    fn test_new_report_serializes_type_field() {
        let report = NewReport::new(
            GeoPoint::new(40.7, -74.0),
            ReportDraft::new(ReportKind::Hydrant, "leaking"),
        )
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["type"], "hydrant");
        assert_eq!(json["longitude"], -74.0);
    }

    #[tokio::test]
    async fn test_memory_sink_assigns_ids() {
        let sink = MemoryReportSink::new();
        let report = NewReport::new(
            GeoPoint::new(40.7, -74.0),
            ReportDraft::new(ReportKind::Trash, ""),
        )
        .unwrap();

        assert_eq!(sink.create_report(report.clone()).await.unwrap(), "report-1");
        assert_eq!(sink.create_report(report).await.unwrap(), "report-2");
        assert_eq!(sink.reports().len(), 2);
    }
}
