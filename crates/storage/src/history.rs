// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only run history and the per-run output directories.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::paths::{self, guarded_path, HISTORY_DIR, HISTORY_FILE, RUN_NUMBER_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub timestamp: DateTime<Utc>,
    pub blueprint: PathBuf,
    pub os: String,
    pub command_preview: String,
    pub status: ExecutionStatus,
    pub output: String,
    pub error_message: Option<String>,
}

pub type RunHistory = Vec<ExecutionRecord>;

fn history_path(home: &Path) -> Result<PathBuf, StorageError> {
    guarded_path(home, HISTORY_FILE)
}

fn run_number_path(home: &Path) -> Result<PathBuf, StorageError> {
    guarded_path(home, RUN_NUMBER_FILE)
}

/// Loads the full run history; a missing or corrupt file reads as empty.
pub fn load_history(home: &Path) -> RunHistory {
    try_load_history(home).unwrap_or_default()
}

pub fn try_load_history(home: &Path) -> Result<RunHistory, StorageError> {
    let path = history_path(home)?;
    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(&path, e)),
    };
    serde_json::from_slice(&bytes).map_err(StorageError::Corrupt)
}

/// Appends `records` to the persisted history and rewrites the file.
pub fn append_history(home: &Path, records: &[ExecutionRecord]) -> Result<(), StorageError> {
    paths::ensure_base_dir(home)?;
    let mut history = load_history(home);
    history.extend_from_slice(records);
    let path = history_path(home)?;
    let bytes = serde_json::to_vec_pretty(&history).map_err(StorageError::Corrupt)?;
    paths::write_file(&path, &bytes)
}

/// Reads, increments, and writes `run_number`. Not inherently atomic
/// across concurrent invocations (spec §9 open question); callers should
/// hold [`crate::paths::StateLock`] for the duration of a run.
pub fn next_run_number(home: &Path) -> Result<u64, StorageError> {
    paths::ensure_base_dir(home)?;
    let path = run_number_path(home)?;
    let current: u64 = match std::fs::read_to_string(&path) {
        Ok(s) => s.trim().parse().unwrap_or(0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => return Err(StorageError::io(&path, e)),
    };
    let next = current + 1;
    paths::write_file(&path, next.to_string().as_bytes())?;
    Ok(next)
}

/// Highest run number so far, without incrementing. `0` if no run has happened.
pub fn latest_run_number(home: &Path) -> Result<u64, StorageError> {
    let path = run_number_path(home)?;
    match std::fs::read_to_string(&path) {
        Ok(s) => Ok(s.trim().parse().unwrap_or(0)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(StorageError::io(&path, e)),
    }
}

/// Writes one step's captured output as `history/<run>/<step>.output`.
pub fn write_step_output(
    home: &Path,
    run: u64,
    step: usize,
    stdout: &str,
    stderr: &str,
) -> Result<(), StorageError> {
    let rel = PathBuf::from(HISTORY_DIR).join(run.to_string()).join(format!("{step}.output"));
    let path = guarded_path(home, &rel)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let banner = format!("=== STDOUT ===\n{stdout}\n\n=== STDERR ===\n{stderr}\n");
    paths::write_file(&path, banner.as_bytes())
}

pub fn read_step_output(home: &Path, run: u64, step: usize) -> Result<String, StorageError> {
    let rel = PathBuf::from(HISTORY_DIR).join(run.to_string()).join(format!("{step}.output"));
    let path = guarded_path(home, &rel)?;
    std::fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    #[test]
    fn run_number_increments_from_zero() {
        let home = tempdir().unwrap();
        assert_eq!(next_run_number(home.path()).unwrap(), 1);
        assert_eq!(next_run_number(home.path()).unwrap(), 2);
        assert_eq!(latest_run_number(home.path()).unwrap(), 2);
    }

    #[test]
    fn append_history_is_cumulative() {
        let home = tempdir().unwrap();
        let record = ExecutionRecord {
            timestamp: ts(),
            blueprint: PathBuf::from("/abs/v1.bp"),
            os: "linux".into(),
            command_preview: "apt-get install -y curl".into(),
            status: ExecutionStatus::Success,
            output: "ok".into(),
            error_message: None,
        };
        append_history(home.path(), &[record.clone()]).unwrap();
        append_history(home.path(), &[record]).unwrap();
        assert_eq!(load_history(home.path()).len(), 2);
    }

    #[test]
    fn step_output_banner_matches_layout() {
        let home = tempdir().unwrap();
        write_step_output(home.path(), 7, 1, "out", "err").unwrap();
        let content = read_step_output(home.path(), 7, 1).unwrap();
        assert_eq!(content, "=== STDOUT ===\nout\n\n=== STDERR ===\nerr\n");
    }
}
