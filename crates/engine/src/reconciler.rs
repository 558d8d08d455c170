// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Combines the current rule set with persisted state to produce a
//! concrete execution plan: desired rules, synthesized auto-uninstalls,
//! and (when no skip filters are active) eager filesystem cleanup for
//! clones and decrypted files (C6).

use std::path::Path;

use bp_core::{
    ClonePayload, DecryptPayload, GpgKeyPayload, InstallPayload, KnownHostsPayload, MkdirPayload,
    Os, Rule,
};
use bp_handlers::{
    remove_clone_dir, remove_decrypted_file, AnyHandler, Handler,
};
use bp_storage::StateDocument;

/// The ordered plan the driver executes: desired rules first, then
/// whatever drift synthesized for resources that disappeared from the
/// blueprint. Also records how many clones/decrypts were eagerly
/// cleaned up on disk, for the plan-mode summary.
#[derive(Debug, Default)]
pub struct Plan {
    pub desired: Vec<Rule>,
    pub auto_uninstalls: Vec<Rule>,
    pub cleaned_clones: usize,
    pub cleaned_decrypts: usize,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.desired.is_empty() && self.auto_uninstalls.is_empty()
    }

    /// `desired` followed by `auto_uninstalls`, the merge order §4.6 step 5
    /// specifies before the resolver re-sorts by dependency.
    pub fn merged(&self) -> Vec<Rule> {
        self.desired.iter().cloned().chain(self.auto_uninstalls.iter().cloned()).collect()
    }
}

fn dummy_install_handler() -> AnyHandler {
    AnyHandler::for_rule(&Rule::new(bp_core::Action::Install(InstallPayload { packages: Vec::new() })))
}

fn dummy_mkdir_handler() -> AnyHandler {
    AnyHandler::for_rule(&Rule::new(bp_core::Action::Mkdir(MkdirPayload {
        path: Default::default(),
        mode: None,
    })))
}

fn dummy_known_hosts_handler() -> AnyHandler {
    AnyHandler::for_rule(&Rule::new(bp_core::Action::KnownHosts(KnownHostsPayload {
        host: String::new(),
        key_type: None,
    })))
}

fn dummy_gpg_key_handler() -> AnyHandler {
    AnyHandler::for_rule(&Rule::new(bp_core::Action::GpgKey(GpgKeyPayload {
        key_url: String::new(),
        keyring: String::new(),
        deb_url: String::new(),
    })))
}

fn dummy_clone_handler() -> AnyHandler {
    AnyHandler::for_rule(&Rule::new(bp_core::Action::Clone(ClonePayload {
        url: String::new(),
        dest: Default::default(),
        branch: None,
    })))
}

fn dummy_decrypt_handler() -> AnyHandler {
    AnyHandler::for_rule(&Rule::new(bp_core::Action::Decrypt(DecryptPayload::new(
        Default::default(),
        Default::default(),
        None,
    ))))
}

/// `blueprint` must already be normalized (see [`bp_parser::normalize`]).
pub fn reconcile(
    rules: &[Rule],
    state: &mut StateDocument,
    os: &Os,
    blueprint: &Path,
    skip_group: Option<&str>,
    skip_id: Option<&str>,
) -> Plan {
    let after_skip: Vec<Rule> = rules
        .iter()
        .filter(|r| {
            let group_skipped = skip_group.is_some() && r.group.as_deref() == skip_group;
            let id_skipped = skip_id.is_some() && r.id.as_deref() == skip_id;
            !group_skipped && !id_skipped
        })
        .cloned()
        .collect();

    let desired: Vec<Rule> = after_skip.into_iter().filter(|r| r.applies_to(os)).collect();

    // Scenario 5 (§8): presence of either skip flag suppresses all
    // drift-derived work, not just the rules it directly matches.
    let suppress_drift = skip_group.is_some() || skip_id.is_some();

    let mut auto_uninstalls = Vec::new();
    let mut cleaned_clones = 0;
    let mut cleaned_decrypts = 0;

    if !suppress_drift {
        for handler in [
            dummy_install_handler(),
            dummy_mkdir_handler(),
            dummy_known_hosts_handler(),
            dummy_gpg_key_handler(),
        ] {
            auto_uninstalls.extend(handler.find_stale_in_state(state, &desired, blueprint, os));
        }

        for rule in dummy_clone_handler().find_stale_in_state(state, &desired, blueprint, os) {
            if let bp_core::Action::Uninstall(bp_core::UninstallPayload::ClonePath(path)) = &rule.action {
                remove_clone_dir(path);
                state.remove_clone(path, blueprint, os.tag());
                cleaned_clones += 1;
            }
        }

        for rule in dummy_decrypt_handler().find_stale_in_state(state, &desired, blueprint, os) {
            if let bp_core::Action::Uninstall(bp_core::UninstallPayload::DecryptPath(path)) = &rule.action {
                remove_decrypted_file(path);
                state.remove_decrypt(path, blueprint, os.tag());
                cleaned_decrypts += 1;
            }
        }
    }

    Plan { desired, auto_uninstalls, cleaned_clones, cleaned_decrypts }
}
