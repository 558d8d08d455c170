// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use bp_core::{Action, MkdirPayload, Os, Rule};
use bp_storage::{MkdirEntry, StateDocument};
use chrono::Utc;

use crate::error::HandlerError;
use crate::handler::{Handler, HandlerContext, HandlerOutcome};
use crate::util::resolve_against;

pub struct MkdirHandler {
    pub payload: MkdirPayload,
}

impl MkdirHandler {
    pub fn new(payload: MkdirPayload) -> Self {
        Self { payload }
    }

    fn resolved(&self, base_dir: &Path) -> PathBuf {
        resolve_against(base_dir, &self.payload.path)
    }
}

impl Handler for MkdirHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let path = self.resolved(ctx.base_dir);
        std::fs::create_dir_all(&path).map_err(|e| HandlerError::io(&path, e))?;
        if let Some(mode) = self.payload.mode {
            set_mode(&path, mode)?;
        }
        Ok(HandlerOutcome { detail: format!("created {}", path.display()), ..Default::default() })
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let path = self.resolved(ctx.base_dir);
        remove_directory(&path)?;
        Ok(HandlerOutcome { detail: format!("removed {}", path.display()), ..Default::default() })
    }

    fn command_preview(&self, ctx: &HandlerContext, is_revert: bool) -> String {
        let path = self.resolved(ctx.base_dir).display().to_string();
        if is_revert {
            format!("rm -rf {path}")
        } else {
            match self.payload.mode {
                Some(mode) => format!("mkdir -p {path} && chmod {mode:o} {path}"),
                None => format!("mkdir -p {path}"),
            }
        }
    }

    fn display_summary(&self) -> String {
        format!("mkdir {}", self.payload.path.display())
    }

    fn dependency_key(&self) -> String {
        self.payload.path.display().to_string()
    }

    fn find_stale_in_state(
        &self,
        state: &StateDocument,
        current_rules: &[Rule],
        blueprint: &Path,
        os: &Os,
    ) -> Vec<Rule> {
        let base_dir = blueprint.parent().unwrap_or_else(|| Path::new("."));
        let desired: std::collections::HashSet<PathBuf> = current_rules
            .iter()
            .filter_map(|r| match &r.action {
                Action::Mkdir(p) => Some(resolve_against(base_dir, &p.path)),
                _ => None,
            })
            .collect();

        state
            .mkdirs
            .iter()
            .filter(|e| e.blueprint == blueprint && e.os == os.tag() && !desired.contains(&e.path))
            .map(|e| {
                Rule::new(Action::Uninstall(bp_core::UninstallPayload::MkdirPath(e.path.clone())))
            })
            .collect()
    }

    fn update_state(
        &self,
        state: &mut StateDocument,
        _outcome: &HandlerOutcome,
        blueprint: &Path,
        os: &Os,
        is_revert: bool,
    ) {
        let base_dir = blueprint.parent().unwrap_or_else(|| Path::new("."));
        let path = self.resolved(base_dir);
        if is_revert {
            state.remove_mkdir(&path, blueprint, os.tag());
        } else {
            state.upsert_mkdir(MkdirEntry {
                path,
                mode: self.payload.mode,
                blueprint: blueprint.to_path_buf(),
                os: os.tag().to_string(),
                created_at: Utc::now(),
            });
        }
    }
}

/// Recursive delete used both by [`MkdirHandler::revert`] and by the
/// `uninstall` handler's `MkdirPath` target.
pub(crate) fn remove_directory(path: &Path) -> Result<(), HandlerError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HandlerError::io(path, e)),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), HandlerError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| HandlerError::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), HandlerError> {
    Ok(())
}
