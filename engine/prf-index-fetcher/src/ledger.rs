//! Completed-export ledger
//!
//! A plain CSV with one `file_name,grid,saved_at` row per successful download.
//! Rows are keyed on the output file name, which encodes grid, year range and
//! format, so a rerun only skips exports that were actually written before.

use crate::error::{FetchError, Result};
use crate::models::ExportRequest;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub struct CompletedLedger {
    path: PathBuf,
    completed: HashSet<String>,
}

impl CompletedLedger {
    /// Open the ledger at `path`. A missing file is an empty ledger.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let completed = match fs::read_to_string(&path).await {
            Ok(contents) => parse_completed(&contents, &path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, completed })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, request: &ExportRequest) -> bool {
        self.completed.contains(&request.file_name())
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Append `request` to the ledger file
    pub async fn mark_completed(
        &mut self,
        request: &ExportRequest,
        saved_at: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let file_name = request.file_name();
        let row = format!("{},{},{}\n", file_name, request.grid, saved_at.to_rfc3339());

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(row.as_bytes()).await?;
        file.flush().await?;

        self.completed.insert(file_name);
        Ok(())
    }
}

fn parse_completed(contents: &str, path: &Path) -> Result<HashSet<String>> {
    let mut completed = HashSet::new();

    for (line_no, line) in contents.lines().enumerate() {
        let first = line.split(',').next().unwrap_or("").trim();
        if first.is_empty() {
            continue;
        }

        if !first.starts_with("grid_") {
            return Err(FetchError::ledger(format!(
                "{}:{}: expected an export file name, found '{}'",
                path.display(),
                line_no + 1,
                first
            )));
        }
        completed.insert(first.to_string());
    }

    Ok(completed)
}
