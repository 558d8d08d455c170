// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use bp_core::{Action, GpgKeyPayload, Os, Rule};
use bp_storage::{GpgKeyEntry, StateDocument};
use chrono::Utc;

use crate::error::HandlerError;
use crate::handler::{Handler, HandlerContext, HandlerOutcome, RequiresSudo};

const TRUSTED_GPG_DIR: &str = "/etc/apt/trusted.gpg.d";
const SOURCES_LIST_DIR: &str = "/etc/apt/sources.list.d";

pub struct GpgKeyHandler {
    pub payload: GpgKeyPayload,
}

impl GpgKeyHandler {
    pub fn new(payload: GpgKeyPayload) -> Self {
        Self { payload }
    }

    fn keyring_path(&self) -> PathBuf {
        Path::new(TRUSTED_GPG_DIR).join(format!("{}.gpg", self.payload.keyring))
    }

    fn source_path(&self) -> PathBuf {
        Path::new(SOURCES_LIST_DIR).join(format!("{}.list", self.payload.keyring))
    }
}

impl Handler for GpgKeyHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let keyring = self.keyring_path();
        let cmd = format!(
            "curl -fsSL {} | gpg --dearmor -o {}",
            self.payload.key_url,
            keyring.display()
        );
        let out = ctx.executor.execute(&format!("sudo sh -c \"{cmd}\""))?;
        if !out.success {
            return Err(HandlerError::Git(format!("failed to install gpg key: {}", out.stderr)));
        }

        let source_line = format!(
            "deb [signed-by={}] {} stable main\n",
            keyring.display(),
            self.payload.deb_url
        );
        let source_path = self.source_path();
        let write_cmd = format!(
            "sudo sh -c \"printf '%s' '{}' > {}\"",
            source_line.replace('\'', "'\\''"),
            source_path.display()
        );
        let out = ctx.executor.execute(&write_cmd)?;
        if !out.success {
            return Err(HandlerError::Git(format!("failed to write apt source: {}", out.stderr)));
        }

        Ok(HandlerOutcome { detail: format!("gpg-key {}", self.payload.keyring), ..Default::default() })
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        remove_gpg_keyring(&self.payload.keyring, ctx)?;
        Ok(HandlerOutcome { detail: format!("removed gpg-key {}", self.payload.keyring), ..Default::default() })
    }

    fn command_preview(&self, _ctx: &HandlerContext, is_revert: bool) -> String {
        if is_revert {
            format!(
                "sudo rm -f {} {}",
                self.keyring_path().display(),
                self.source_path().display()
            )
        } else {
            format!(
                "curl -fsSL {} | gpg --dearmor -o {}",
                self.payload.key_url,
                self.keyring_path().display()
            )
        }
    }

    fn display_summary(&self) -> String {
        format!("gpg-key {}", self.payload.keyring)
    }

    fn dependency_key(&self) -> String {
        self.payload.keyring.clone()
    }

    fn find_stale_in_state(
        &self,
        state: &StateDocument,
        current_rules: &[Rule],
        blueprint: &Path,
        os: &Os,
    ) -> Vec<Rule> {
        let desired: std::collections::HashSet<&str> = current_rules
            .iter()
            .filter_map(|r| match &r.action {
                Action::GpgKey(p) => Some(p.keyring.as_str()),
                _ => None,
            })
            .collect();

        state
            .gpg_keys
            .iter()
            .filter(|e| e.blueprint == blueprint && e.os == os.tag() && !desired.contains(e.keyring.as_str()))
            .map(|e| Rule::new(Action::Uninstall(bp_core::UninstallPayload::GpgKeyring(e.keyring.clone()))))
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
        if is_revert {
            state.remove_gpg_key(&self.payload.keyring, blueprint, os.tag());
        } else {
            state.upsert_gpg_key(GpgKeyEntry {
                keyring: self.payload.keyring.clone(),
                deb_url: self.payload.deb_url.clone(),
                blueprint: blueprint.to_path_buf(),
                os: os.tag().to_string(),
                added_at: Utc::now(),
            });
        }
    }
}

impl RequiresSudo for GpgKeyHandler {
    fn requires_sudo(&self, os: &Os) -> bool {
        !matches!(os, Os::Mac)
    }
}

/// Removes the keyring file and its associated apt source list entry.
/// Best-effort: a missing file on either side is not an error.
pub(crate) fn remove_gpg_keyring(keyring: &str, ctx: &HandlerContext) -> Result<(), HandlerError> {
    let keyring_path = Path::new(TRUSTED_GPG_DIR).join(format!("{keyring}.gpg"));
    let source_path = Path::new(SOURCES_LIST_DIR).join(format!("{keyring}.list"));
    let cmd = format!(
        "sudo rm -f {} {}",
        keyring_path.display(),
        source_path.display()
    );
    let out = ctx.executor.execute(&cmd)?;
    if !out.success {
        tracing::warn!(keyring, stderr = %out.stderr, "failed to remove gpg keyring files");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyring_and_source_paths_are_derived_from_name() {
        let handler = GpgKeyHandler::new(GpgKeyPayload {
            key_url: "https://example.com/key.gpg".into(),
            keyring: "example".into(),
            deb_url: "https://example.com/apt".into(),
        });
        assert_eq!(handler.keyring_path(), PathBuf::from("/etc/apt/trusted.gpg.d/example.gpg"));
        assert_eq!(handler.source_path(), PathBuf::from("/etc/apt/sources.list.d/example.list"));
    }

    #[test]
    fn gpg_key_requires_sudo_everywhere_but_mac() {
        let handler = GpgKeyHandler::new(GpgKeyPayload {
            key_url: "https://example.com/key.gpg".into(),
            keyring: "example".into(),
            deb_url: "https://example.com/apt".into(),
        });
        assert!(handler.requires_sudo(&Os::Linux));
        assert!(!handler.requires_sudo(&Os::Mac));
    }
}
