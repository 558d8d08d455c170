// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use bp_core::{Action, ClonePayload, Os, Rule};
use bp_storage::{CloneEntry, StateDocument};
use chrono::Utc;

use crate::error::HandlerError;
use crate::handler::{Handler, HandlerContext, HandlerOutcome};
use crate::util::expand_tilde;

pub struct CloneHandler {
    pub payload: ClonePayload,
}

impl CloneHandler {
    pub fn new(payload: ClonePayload) -> Self {
        Self { payload }
    }

    fn resolved_dest(&self, base_dir: &Path) -> PathBuf {
        let expanded = expand_tilde(&self.payload.dest);
        if expanded.is_absolute() {
            expanded
        } else {
            base_dir.join(expanded)
        }
    }
}

impl Handler for CloneHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let dest = self.resolved_dest(ctx.base_dir);
        let branch = self.payload.branch.as_deref();

        if !dest.exists() {
            let commit = ctx.git.clone_fresh(&self.payload.url, &dest, branch)?;
            let mut outcome = HandlerOutcome { detail: format!("cloned ({commit})"), ..Default::default() };
            outcome.extra.insert("commit".to_string(), commit);
            Ok(outcome)
        } else {
            let sync = ctx.git.sync_existing(&dest, branch)?;
            let detail = if sync.old_head == sync.new_head {
                "Already up to date".to_string()
            } else {
                format!("Updated ({}\u{2192}{})", short(&sync.old_head), short(&sync.new_head))
            };
            let mut outcome = HandlerOutcome { detail, ..Default::default() };
            outcome.extra.insert("commit".to_string(), sync.new_head);
            Ok(outcome)
        }
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let dest = self.resolved_dest(ctx.base_dir);
        remove_clone_dir(&dest);
        Ok(HandlerOutcome { detail: format!("removed {}", dest.display()), ..Default::default() })
    }

    fn command_preview(&self, ctx: &HandlerContext, is_revert: bool) -> String {
        let dest = self.resolved_dest(ctx.base_dir);
        if is_revert {
            format!("rm -rf {}", dest.display())
        } else if dest.exists() {
            format!("git -C {} fetch origin && git -C {} reset --hard", dest.display(), dest.display())
        } else {
            format!("git clone {} {}", self.payload.url, dest.display())
        }
    }

    fn display_summary(&self) -> String {
        format!("clone {} to:{}", self.payload.url, self.payload.dest.display())
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
                Action::Clone(p) => {
                    let expanded = expand_tilde(&p.dest);
                    Some(if expanded.is_absolute() { expanded } else { base_dir.join(expanded) })
                }
                _ => None,
            })
            .collect();

        state
            .clones
            .iter()
            .filter(|e| e.blueprint == blueprint && e.os == os.tag() && !desired.contains(&e.dest))
            .map(|e| Rule::new(Action::Uninstall(bp_core::UninstallPayload::ClonePath(e.dest.clone()))))
            .collect()
    }

    fn update_state(
        &self,
        state: &mut StateDocument,
        outcome: &HandlerOutcome,
        blueprint: &Path,
        os: &Os,
        is_revert: bool,
    ) {
        let base_dir = blueprint.parent().unwrap_or_else(|| Path::new("."));
        let dest = self.resolved_dest(base_dir);
        if is_revert {
            state.remove_clone(&dest, blueprint, os.tag());
        } else {
            let commit = outcome.extra.get("commit").cloned().unwrap_or_default();
            state.upsert_clone(CloneEntry {
                dest,
                url: self.payload.url.clone(),
                commit,
                blueprint: blueprint.to_path_buf(),
                os: os.tag().to_string(),
                updated_at: Utc::now(),
            });
        }
    }
}

fn short(commit: &str) -> &str {
    &commit[..commit.len().min(7)]
}

/// Best-effort recursive delete; failures are logged, not propagated, per
/// the reconciler's cleanup policy for cloned directories (spec §4.6 step 4).
pub fn remove_clone_dir(path: &Path) {
    if let Err(e) = std::fs::remove_dir_all(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove stale clone directory");
        }
    }
}
