// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`AnyHandler`] picks the concrete handler for a rule's action and erases
//! it behind a single enum so the resolver and driver don't need to know
//! about every handler type.

use std::path::Path;

use bp_core::{Action, Os, Rule};
use bp_storage::StateDocument;

use crate::asdf::AsdfHandler;
use crate::clone::CloneHandler;
use crate::decrypt::DecryptHandler;
use crate::error::HandlerError;
use crate::gpg_key::GpgKeyHandler;
use crate::handler::{Handler, HandlerContext, HandlerOutcome, RequiresSudo};
use crate::install::{InstallHandler, UninstallHandler};
use crate::known_hosts::KnownHostsHandler;
use crate::mkdir::MkdirHandler;

pub enum AnyHandler {
    Install(InstallHandler),
    Uninstall(UninstallHandler),
    Clone(CloneHandler),
    Mkdir(MkdirHandler),
    Decrypt(DecryptHandler),
    KnownHosts(KnownHostsHandler),
    GpgKey(GpgKeyHandler),
    Asdf(AsdfHandler),
}

impl AnyHandler {
    pub fn for_rule(rule: &Rule) -> Self {
        match rule.action.clone() {
            Action::Install(p) => Self::Install(InstallHandler::new(p)),
            Action::Uninstall(p) => Self::Uninstall(UninstallHandler::new(p)),
            Action::Clone(p) => Self::Clone(CloneHandler::new(p)),
            Action::Mkdir(p) => Self::Mkdir(MkdirHandler::new(p)),
            Action::Decrypt(p) => Self::Decrypt(DecryptHandler::new(p)),
            Action::KnownHosts(p) => Self::KnownHosts(KnownHostsHandler::new(p)),
            Action::GpgKey(p) => Self::GpgKey(GpgKeyHandler::new(p)),
            Action::Asdf(p) => Self::Asdf(AsdfHandler::new(p)),
        }
    }

    /// Whether this variant opts into privilege escalation at all; used by
    /// the driver to decide if it should prompt for a sudo password before
    /// the run starts.
    pub fn requires_sudo(&self, os: &Os) -> bool {
        match self {
            Self::Install(h) => h.requires_sudo(os),
            Self::Uninstall(h) => h.requires_sudo(os),
            Self::GpgKey(h) => h.requires_sudo(os),
            Self::Clone(_) | Self::Mkdir(_) | Self::Decrypt(_) | Self::KnownHosts(_) | Self::Asdf(_) => false,
        }
    }
}

impl Handler for AnyHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        match self {
            Self::Install(h) => h.apply(ctx),
            Self::Uninstall(h) => h.apply(ctx),
            Self::Clone(h) => h.apply(ctx),
            Self::Mkdir(h) => h.apply(ctx),
            Self::Decrypt(h) => h.apply(ctx),
            Self::KnownHosts(h) => h.apply(ctx),
            Self::GpgKey(h) => h.apply(ctx),
            Self::Asdf(h) => h.apply(ctx),
        }
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        match self {
            Self::Install(h) => h.revert(ctx),
            Self::Uninstall(h) => h.revert(ctx),
            Self::Clone(h) => h.revert(ctx),
            Self::Mkdir(h) => h.revert(ctx),
            Self::Decrypt(h) => h.revert(ctx),
            Self::KnownHosts(h) => h.revert(ctx),
            Self::GpgKey(h) => h.revert(ctx),
            Self::Asdf(h) => h.revert(ctx),
        }
    }

    fn command_preview(&self, ctx: &HandlerContext, is_revert: bool) -> String {
        match self {
            Self::Install(h) => h.command_preview(ctx, is_revert),
            Self::Uninstall(h) => h.command_preview(ctx, is_revert),
            Self::Clone(h) => h.command_preview(ctx, is_revert),
            Self::Mkdir(h) => h.command_preview(ctx, is_revert),
            Self::Decrypt(h) => h.command_preview(ctx, is_revert),
            Self::KnownHosts(h) => h.command_preview(ctx, is_revert),
            Self::GpgKey(h) => h.command_preview(ctx, is_revert),
            Self::Asdf(h) => h.command_preview(ctx, is_revert),
        }
    }

    fn display_summary(&self) -> String {
        match self {
            Self::Install(h) => h.display_summary(),
            Self::Uninstall(h) => h.display_summary(),
            Self::Clone(h) => h.display_summary(),
            Self::Mkdir(h) => h.display_summary(),
            Self::Decrypt(h) => h.display_summary(),
            Self::KnownHosts(h) => h.display_summary(),
            Self::GpgKey(h) => h.display_summary(),
            Self::Asdf(h) => h.display_summary(),
        }
    }

    fn dependency_key(&self) -> String {
        match self {
            Self::Install(h) => h.dependency_key(),
            Self::Uninstall(h) => h.dependency_key(),
            Self::Clone(h) => h.dependency_key(),
            Self::Mkdir(h) => h.dependency_key(),
            Self::Decrypt(h) => h.dependency_key(),
            Self::KnownHosts(h) => h.dependency_key(),
            Self::GpgKey(h) => h.dependency_key(),
            Self::Asdf(h) => h.dependency_key(),
        }
    }

    fn find_stale_in_state(
        &self,
        state: &StateDocument,
        current_rules: &[Rule],
        blueprint: &Path,
        os: &Os,
    ) -> Vec<Rule> {
        match self {
            Self::Install(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
            Self::Uninstall(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
            Self::Clone(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
            Self::Mkdir(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
            Self::Decrypt(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
            Self::KnownHosts(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
            Self::GpgKey(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
            Self::Asdf(h) => h.find_stale_in_state(state, current_rules, blueprint, os),
        }
    }

    fn update_state(
        &self,
        state: &mut StateDocument,
        outcome: &HandlerOutcome,
        blueprint: &Path,
        os: &Os,
        is_revert: bool,
    ) {
        match self {
            Self::Install(h) => h.update_state(state, outcome, blueprint, os, is_revert),
            Self::Uninstall(h) => h.update_state(state, outcome, blueprint, os, is_revert),
            Self::Clone(h) => h.update_state(state, outcome, blueprint, os, is_revert),
            Self::Mkdir(h) => h.update_state(state, outcome, blueprint, os, is_revert),
            Self::Decrypt(h) => h.update_state(state, outcome, blueprint, os, is_revert),
            Self::KnownHosts(h) => h.update_state(state, outcome, blueprint, os, is_revert),
            Self::GpgKey(h) => h.update_state(state, outcome, blueprint, os, is_revert),
            Self::Asdf(h) => h.update_state(state, outcome, blueprint, os, is_revert),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::{InstallPayload, Package};

    #[test]
    fn for_rule_picks_install_handler() {
        let rule = Rule::new(Action::Install(InstallPayload { packages: vec![Package::new("curl")] }));
        match AnyHandler::for_rule(&rule) {
            AnyHandler::Install(_) => {}
            _ => panic!("expected install handler"),
        }
    }
}
