use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Grid identifier. Sent to the export endpoint as-is, no validation.
pub type GridId = i64;

/// Inclusive span of years requested from the export endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start_year: i32,
    pub end_year: i32,
}

impl YearRange {
    pub const DEFAULT_START_YEAR: i32 = 1948;
    pub const DEFAULT_END_YEAR: i32 = 2025;

    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self { start_year, end_year }
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_START_YEAR, Self::DEFAULT_END_YEAR)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// Export format requested from the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    /// Value of the `format` query parameter
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
        }
    }

    /// Extension used for the saved file
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

/// A single export request for one grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub grid: GridId,
    pub range: YearRange,
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new(grid: GridId, range: YearRange, format: ExportFormat) -> Self {
        Self { grid, range, format }
    }

    /// Query parameters in the order the endpoint documents them
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("gridId", self.grid.to_string()),
            ("startYear", self.range.start_year.to_string()),
            ("endYear", self.range.end_year.to_string()),
            ("format", self.format.as_query_value().to_string()),
        ]
    }

    /// File name derived from grid, year range and format
    pub fn file_name(&self) -> String {
        format!(
            "grid_{}_{}_{}.{}",
            self.grid,
            self.range.start_year,
            self.range.end_year,
            self.format.file_extension()
        )
    }

    /// Full output path under `output_dir`
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.file_name())
    }
}

/// Raw response from the export endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ExportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

/// What happened to one grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    Saved { path: PathBuf, bytes: usize },
    BadStatus { status: u16 },
    EmptyBody { status: u16 },
    TransportFailed { message: String },
    WriteFailed { path: PathBuf, message: String },
}

impl FetchOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FetchOutcome::Saved { .. })
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, FetchOutcome::TransportFailed { .. })
    }
}

/// Summary of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub requested: usize,
    pub saved: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<(GridId, FetchOutcome)>,
    pub halted_at: Option<GridId>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            requested: 0,
            saved: 0,
            failed: 0,
            skipped: 0,
            outcomes: Vec::new(),
            halted_at: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, grid: GridId, outcome: FetchOutcome) {
        self.requested += 1;
        if outcome.is_saved() {
            self.saved += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push((grid, outcome));
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
