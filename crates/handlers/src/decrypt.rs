// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use bp_core::{Action, DecryptPayload, Os, Rule};
use bp_storage::{DecryptEntry, StateDocument};
use chrono::Utc;

use crate::crypto;
use crate::error::HandlerError;
use crate::handler::{Handler, HandlerContext, HandlerOutcome};
use crate::util::resolve_against;

pub struct DecryptHandler {
    pub payload: DecryptPayload,
}

impl DecryptHandler {
    pub fn new(payload: DecryptPayload) -> Self {
        Self { payload }
    }

    fn resolved(&self, base_dir: &Path) -> (PathBuf, PathBuf) {
        (resolve_against(base_dir, &self.payload.src), resolve_against(base_dir, &self.payload.dest))
    }
}

impl Handler for DecryptHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let (src, dest) = self.resolved(ctx.base_dir);
        let password = ctx
            .passwords
            .get(&self.payload.password_id)
            .ok_or_else(|| HandlerError::MissingPassword(self.payload.password_id.clone()))?;

        let sealed = std::fs::read(&src).map_err(|e| HandlerError::io(&src, e))?;
        let plaintext = crypto::open(&sealed, password)?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HandlerError::io(parent, e))?;
        }
        std::fs::write(&dest, &plaintext).map_err(|e| HandlerError::io(&dest, e))?;

        Ok(HandlerOutcome { detail: format!("decrypted {}", dest.display()), ..Default::default() })
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let (_, dest) = self.resolved(ctx.base_dir);
        remove_decrypted_file(&dest);
        Ok(HandlerOutcome { detail: format!("removed {}", dest.display()), ..Default::default() })
    }

    fn command_preview(&self, ctx: &HandlerContext, is_revert: bool) -> String {
        let (src, dest) = self.resolved(ctx.base_dir);
        if is_revert {
            format!("rm -f {}", dest.display())
        } else {
            format!("# decrypt {} -> {}", src.display(), dest.display())
        }
    }

    fn display_summary(&self) -> String {
        format!("decrypt {} to:{}", self.payload.src.display(), self.payload.dest.display())
    }

    fn dependency_key(&self) -> String {
        self.payload.dest.display().to_string()
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
                Action::Decrypt(p) => Some(resolve_against(base_dir, &p.dest)),
                _ => None,
            })
            .collect();

        state
            .decrypts
            .iter()
            .filter(|e| e.blueprint == blueprint && e.os == os.tag() && !desired.contains(&e.dest))
            .map(|e| Rule::new(Action::Uninstall(bp_core::UninstallPayload::DecryptPath(e.dest.clone()))))
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
        let (src, dest) = self.resolved(base_dir);
        if is_revert {
            state.remove_decrypt(&dest, blueprint, os.tag());
        } else {
            state.upsert_decrypt(DecryptEntry {
                dest,
                src,
                password_id: self.payload.password_id.clone(),
                blueprint: blueprint.to_path_buf(),
                os: os.tag().to_string(),
                decrypted_at: Utc::now(),
            });
        }
    }
}

/// Best-effort delete; failures are silent per the reconciler's cleanup
/// policy for decrypted files (spec §4.6 step 4).
pub fn remove_decrypted_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!(path = %path.display(), error = %e, "failed to remove decrypted file, ignoring");
        }
    }
}
