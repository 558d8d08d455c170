// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install/uninstall handlers: packages, plus the `uninstall` action's
//! dispatch to whichever other resource class a synthesized uninstall
//! targets (clone/decrypt/mkdir/known_hosts/gpg-key).

use std::path::Path;

use bp_core::{Action, InstallPayload, Os, Package, Rule, UninstallPayload};
use bp_storage::{PackageEntry, StateDocument};
use chrono::Utc;

use crate::clone;
use crate::decrypt;
use crate::error::HandlerError;
use crate::gpg_key;
use crate::handler::{Handler, HandlerContext, HandlerOutcome, RequiresSudo};
use crate::known_hosts;
use crate::mkdir;

fn package_manager_command(os: &Os, action: &str, packages: &[Package]) -> String {
    let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    match os {
        Os::Mac => format!("brew {action} -y {}", names.join(" ")),
        _ => {
            let apt_action = if action == "install" { "install" } else { "remove" };
            format!("apt-get {apt_action} -y {}", names.join(" "))
        }
    }
}

pub struct InstallHandler {
    pub payload: InstallPayload,
}

impl InstallHandler {
    pub fn new(payload: InstallPayload) -> Self {
        Self { payload }
    }
}

impl Handler for InstallHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let cmd = self.command_preview(ctx, false);
        let out = ctx.executor.execute(&cmd)?;
        Ok(HandlerOutcome {
            stdout: out.stdout,
            stderr: out.stderr,
            detail: format!(
                "installed {}",
                self.payload.packages.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
            ),
            ..Default::default()
        })
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let cmd = package_manager_command(ctx.os, "uninstall", &self.payload.packages);
        let out = ctx.executor.execute(&cmd)?;
        Ok(HandlerOutcome {
            stdout: out.stdout,
            stderr: out.stderr,
            detail: "reverted install".to_string(),
            ..Default::default()
        })
    }

    fn command_preview(&self, ctx: &HandlerContext, _is_revert: bool) -> String {
        package_manager_command(ctx.os, "install", &self.payload.packages)
    }

    fn display_summary(&self) -> String {
        format!(
            "install {}",
            self.payload.packages.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ")
        )
    }

    fn dependency_key(&self) -> String {
        self.payload.packages.first().map(|p| p.name.clone()).unwrap_or_default()
    }

    fn find_stale_in_state(
        &self,
        state: &StateDocument,
        current_rules: &[Rule],
        blueprint: &Path,
        os: &Os,
    ) -> Vec<Rule> {
        find_stale_packages(state, current_rules, blueprint, os)
    }

    fn update_state(
        &self,
        state: &mut StateDocument,
        _outcome: &HandlerOutcome,
        blueprint: &Path,
        os: &Os,
        _is_revert: bool,
    ) {
        for pkg in &self.payload.packages {
            state.upsert_package(PackageEntry {
                name: pkg.name.clone(),
                version: pkg.version.clone(),
                blueprint: blueprint.to_path_buf(),
                os: os.tag().to_string(),
                installed_at: Utc::now(),
            });
        }
    }
}

impl RequiresSudo for InstallHandler {
    fn requires_sudo(&self, os: &Os) -> bool {
        !matches!(os, Os::Mac) && !crate::handler::running_as_root()
    }
}

/// Synthesizes `uninstall` rules for package state entries under
/// `blueprint`+`os` that no longer appear as an `install` rule.
pub(crate) fn find_stale_packages(
    state: &StateDocument,
    current_rules: &[Rule],
    blueprint: &Path,
    os: &Os,
) -> Vec<Rule> {
    let desired: std::collections::HashSet<&str> = current_rules
        .iter()
        .filter_map(|r| match &r.action {
            Action::Install(p) => Some(p.packages.iter().map(|pkg| pkg.name.as_str())),
            _ => None,
        })
        .flatten()
        .collect();

    state
        .packages
        .iter()
        .filter(|e| e.blueprint == blueprint && e.os == os.tag() && !desired.contains(e.name.as_str()))
        .map(|e| {
            Rule::new(Action::Uninstall(UninstallPayload::Packages(vec![Package::with_version(
                e.name.clone(),
                e.version.clone(),
            )])))
        })
        .collect()
}

pub struct UninstallHandler {
    pub payload: UninstallPayload,
}

impl UninstallHandler {
    pub fn new(payload: UninstallPayload) -> Self {
        Self { payload }
    }
}

impl Handler for UninstallHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        match &self.payload {
            UninstallPayload::Packages(pkgs) => {
                let cmd = package_manager_command(ctx.os, "uninstall", pkgs);
                let out = ctx.executor.execute(&cmd)?;
                Ok(HandlerOutcome { stdout: out.stdout, stderr: out.stderr, detail: "uninstalled".into(), ..Default::default() })
            }
            UninstallPayload::ClonePath(path) => {
                clone::remove_clone_dir(path);
                Ok(HandlerOutcome { detail: format!("removed clone {}", path.display()), ..Default::default() })
            }
            UninstallPayload::DecryptPath(path) => {
                decrypt::remove_decrypted_file(path);
                Ok(HandlerOutcome { detail: format!("removed decrypted file {}", path.display()), ..Default::default() })
            }
            UninstallPayload::MkdirPath(path) => {
                mkdir::remove_directory(path)?;
                Ok(HandlerOutcome { detail: format!("removed directory {}", path.display()), ..Default::default() })
            }
            UninstallPayload::KnownHost(host) => {
                known_hosts::remove_known_host_lines(ctx.home, host)?;
                Ok(HandlerOutcome { detail: format!("removed known_hosts entry for {host}"), ..Default::default() })
            }
            UninstallPayload::GpgKeyring(keyring) => {
                gpg_key::remove_gpg_keyring(keyring, ctx)?;
                Ok(HandlerOutcome { detail: format!("removed gpg keyring {keyring}"), ..Default::default() })
            }
        }
    }

    fn revert(&self, _ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        Ok(HandlerOutcome { detail: "nothing to revert for uninstall".into(), ..Default::default() })
    }

    fn command_preview(&self, ctx: &HandlerContext, _is_revert: bool) -> String {
        match &self.payload {
            UninstallPayload::Packages(pkgs) => package_manager_command(ctx.os, "uninstall", pkgs),
            UninstallPayload::ClonePath(path) => format!("rm -rf {}", path.display()),
            UninstallPayload::DecryptPath(path) => format!("rm -f {}", path.display()),
            UninstallPayload::MkdirPath(path) => format!("rm -rf {}", path.display()),
            UninstallPayload::KnownHost(host) => format!("# remove known_hosts entry for {host}"),
            UninstallPayload::GpgKeyring(keyring) => format!("# remove gpg keyring {keyring}"),
        }
    }

    fn display_summary(&self) -> String {
        match &self.payload {
            UninstallPayload::Packages(pkgs) => {
                format!("uninstall {}", pkgs.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" "))
            }
            UninstallPayload::ClonePath(path) => format!("uninstall clone {}", path.display()),
            UninstallPayload::DecryptPath(path) => format!("uninstall decrypt {}", path.display()),
            UninstallPayload::MkdirPath(path) => format!("uninstall mkdir {}", path.display()),
            UninstallPayload::KnownHost(host) => format!("uninstall known_hosts {host}"),
            UninstallPayload::GpgKeyring(keyring) => format!("uninstall gpg-key {keyring}"),
        }
    }

    fn dependency_key(&self) -> String {
        match &self.payload {
            UninstallPayload::Packages(pkgs) => pkgs.first().map(|p| p.name.clone()).unwrap_or_default(),
            UninstallPayload::ClonePath(path) => path.display().to_string(),
            UninstallPayload::DecryptPath(path) => path.display().to_string(),
            UninstallPayload::MkdirPath(path) => path.display().to_string(),
            UninstallPayload::KnownHost(host) => host.clone(),
            UninstallPayload::GpgKeyring(keyring) => keyring.clone(),
        }
    }

    fn find_stale_in_state(
        &self,
        _state: &StateDocument,
        _current_rules: &[Rule],
        _blueprint: &Path,
        _os: &Os,
    ) -> Vec<Rule> {
        // Synthesized uninstalls are themselves the product of drift
        // detection; they don't recursively synthesize more.
        Vec::new()
    }

    fn update_state(
        &self,
        state: &mut StateDocument,
        _outcome: &HandlerOutcome,
        blueprint: &Path,
        os: &Os,
        _is_revert: bool,
    ) {
        match &self.payload {
            UninstallPayload::Packages(pkgs) => {
                for pkg in pkgs {
                    state.remove_package(&pkg.name, blueprint, os.tag());
                }
            }
            UninstallPayload::ClonePath(path) => state.remove_clone(path, blueprint, os.tag()),
            UninstallPayload::DecryptPath(path) => state.remove_decrypt(path, blueprint, os.tag()),
            UninstallPayload::MkdirPath(path) => state.remove_mkdir(path, blueprint, os.tag()),
            UninstallPayload::KnownHost(host) => state.remove_known_host(host, blueprint, os.tag()),
            UninstallPayload::GpgKeyring(keyring) => state.remove_gpg_key(keyring, blueprint, os.tag()),
        }
    }
}

impl RequiresSudo for UninstallHandler {
    fn requires_sudo(&self, os: &Os) -> bool {
        matches!(self.payload, UninstallPayload::Packages(_)) && !matches!(os, Os::Mac)
            && !crate::handler::running_as_root()
    }
}
