// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ps.json`: an optional liveness file describing the in-progress run,
//! written atomically so a reader never observes a half-written record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nix::sys::signal::kill;
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::paths::{self, guarded_path, PROCESS_STATE_FILE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessState {
    pub pid: u32,
    pub blueprint: PathBuf,
    pub os: String,
    pub total_rules: usize,
    pub current_rule: usize,
    pub current_action: String,
    pub current_detail: String,
    pub started_at: DateTime<Utc>,
    pub rule_started_at: DateTime<Utc>,
}

fn ps_path(home: &Path) -> Result<PathBuf, StorageError> {
    guarded_path(home, PROCESS_STATE_FILE)
}

impl ProcessState {
    pub fn write(&self, home: &Path) -> Result<(), StorageError> {
        paths::ensure_base_dir(home)?;
        let path = ps_path(home)?;
        let bytes = serde_json::to_vec(self).map_err(StorageError::Corrupt)?;
        paths::atomic_write(&path, &bytes)
    }
}

/// Reads `ps.json`, if present.
pub fn read(home: &Path) -> Result<Option<ProcessState>, StorageError> {
    let path = ps_path(home)?;
    match std::fs::read(&path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes).map_err(StorageError::Corrupt)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::io(&path, e)),
    }
}

pub fn remove(home: &Path) -> Result<(), StorageError> {
    let path = ps_path(home)?;
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::io(&path, e)),
    }
}

/// True when `pid` names a process that is still alive, probed with
/// signal 0 (no-op delivery, just an existence check).
pub fn is_pid_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Deletes a stale `ps.json` left behind by a process that is no longer
/// running, so the next invocation starts clean.
pub fn reclaim_if_stale(home: &Path) -> Result<(), StorageError> {
    if let Some(state) = read(home)? {
        if !is_pid_alive(state.pid) {
            tracing::warn!(pid = state.pid, "reclaiming stale ps.json from dead process");
            remove(home)?;
        }
    }
    Ok(())
}
