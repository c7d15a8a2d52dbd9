// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recent-items history for tool pages.
//
// The store is an injected capability: tools receive a `HistoryStore` rather
// than reaching for ambient storage, so tests can swap in `MemoryHistory`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Result, WerkstattError};

/// One remembered tool run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    /// Tool name, e.g. `"image-blur"`.
    pub tool: String,
    /// Short description of what was done.
    pub summary: String,
    /// Name of the produced file, if any.
    pub filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(tool: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool: tool.into(),
            summary: summary.into(),
            filename: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Capped, newest-first list of recent tool runs.
pub trait HistoryStore {
    /// Insert `entry` at the front, then drop the oldest entries beyond `cap`.
    fn append(&mut self, entry: HistoryEntry, cap: usize) -> Result<()>;

    /// All entries, newest first.
    fn list(&self) -> Result<Vec<HistoryEntry>>;
}

fn push_capped(entries: &mut Vec<HistoryEntry>, entry: HistoryEntry, cap: usize) -> Result<()> {
    if cap == 0 {
        return Err(WerkstattError::InvalidParameter(
            "history cap must be at least 1".into(),
        ));
    }
    entries.insert(0, entry);
    entries.truncate(cap);
    Ok(())
}

/// History held in memory for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, entry: HistoryEntry, cap: usize) -> Result<()> {
        push_capped(&mut self.entries, entry, cap)
    }

    fn list(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.entries.clone())
    }
}

/// History persisted as a JSON array in a single file.
///
/// Each append rewrites the whole file; lists are small (capped).
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Vec<HistoryEntry>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl HistoryStore for JsonFileHistory {
    #[instrument(skip(self, entry), fields(path = %self.path.display(), tool = %entry.tool))]
    fn append(&mut self, entry: HistoryEntry, cap: usize) -> Result<()> {
        let mut entries = self.read_entries()?;
        push_capped(&mut entries, entry, cap)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(&entries)?)?;

        debug!(entries = entries.len(), "History written");
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.read_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_history_is_newest_first_and_capped() {
        let mut history = MemoryHistory::new();
        for n in 0..5 {
            history
                .append(HistoryEntry::new("image-blur", format!("run {n}")), 3)
                .unwrap();
        }

        let summaries: Vec<String> = history
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.summary)
            .collect();
        assert_eq!(summaries, vec!["run 4", "run 3", "run 2"]);
    }

    #[test]
    fn zero_cap_is_rejected() {
        let mut history = MemoryHistory::new();
        let result = history.append(HistoryEntry::new("pdf-split", "x"), 0);
        assert!(matches!(result, Err(WerkstattError::InvalidParameter(_))));
        assert!(history.list().unwrap().is_empty());
    }

    #[test]
    fn missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonFileHistory::new(dir.path().join("none.json"));
        assert!(history.list().unwrap().is_empty());
    }

    #[test]
    fn file_history_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("grayscale.json");

        let mut first = JsonFileHistory::new(&path);
        first
            .append(
                HistoryEntry::new("image-grayscale", "grayscale").with_filename("grayscale-a.png"),
                10,
            )
            .unwrap();
        first
            .append(HistoryEntry::new("image-grayscale", "grayscale"), 10)
            .unwrap();

        let second = JsonFileHistory::new(&path);
        let entries = second.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].filename.as_deref(), Some("grayscale-a.png"));
    }

    #[test]
    fn corrupt_file_surfaces_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"[{").unwrap();

        let history = JsonFileHistory::new(&path);
        assert!(matches!(
            history.list(),
            Err(WerkstattError::Serialization(_))
        ));
    }
}
