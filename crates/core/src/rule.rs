// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The parsed, immutable `Rule` record and its action payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::os::Os;
use crate::payload::{
    AsdfPayload, ClonePayload, DecryptPayload, GpgKeyPayload, InstallPayload, KnownHostsPayload,
    MkdirPayload, UninstallPayload,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule id {0:?} must not contain whitespace or ':'")]
    InvalidId(String),
    #[error("group name {0:?} must not contain whitespace or ':'")]
    InvalidGroup(String),
}

fn is_bare_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace) && !s.contains(':')
}

/// One action a rule may carry out, with its action-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Install(InstallPayload),
    Uninstall(UninstallPayload),
    Clone(ClonePayload),
    Mkdir(MkdirPayload),
    Decrypt(DecryptPayload),
    KnownHosts(KnownHostsPayload),
    GpgKey(GpgKeyPayload),
    Asdf(AsdfPayload),
}

crate::simple_display! {
    Action {
        Install(..) => "install",
        Uninstall(..) => "uninstall",
        Clone(..) => "clone",
        Mkdir(..) => "mkdir",
        Decrypt(..) => "decrypt",
        KnownHosts(..) => "known_hosts",
        GpgKey(..) => "gpg-key",
        Asdf(..) => "asdf",
    }
}

impl Action {
    /// The action keyword as it appears in the blueprint DSL.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Install(_) => "install",
            Action::Uninstall(_) => "uninstall",
            Action::Clone(_) => "clone",
            Action::Mkdir(_) => "mkdir",
            Action::Decrypt(_) => "decrypt",
            Action::KnownHosts(_) => "known_hosts",
            Action::GpgKey(_) => "gpg-key",
            Action::Asdf(_) => "asdf",
        }
    }
}

/// A single declarative directive parsed from a blueprint line (or
/// synthesized by the reconciler for an auto-uninstall). Value-typed and
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: Option<String>,
    pub action: Action,
    /// OS allow-list; empty means "every OS".
    pub on: Vec<Os>,
    /// Explicit dependency keys from `after:`.
    pub after: Vec<String>,
    pub group: Option<String>,
    /// 1-based source line number, for parser diagnostics. `0` for
    /// rules synthesized outside of parsing (auto-uninstalls).
    pub line: usize,
}

impl Rule {
    pub fn new(action: Action) -> Self {
        Self { id: None, action, on: Vec::new(), after: Vec::new(), group: None, line: 0 }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self, RuleError> {
        let id = id.into();
        if !is_bare_token(&id) {
            return Err(RuleError::InvalidId(id));
        }
        self.id = Some(id);
        Ok(self)
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Result<Self, RuleError> {
        let group = group.into();
        if !is_bare_token(&group) {
            return Err(RuleError::InvalidGroup(group));
        }
        self.group = Some(group);
        Ok(self)
    }

    pub fn with_on(mut self, on: Vec<Os>) -> Self {
        self.on = on;
        self
    }

    pub fn with_after(mut self, after: Vec<String>) -> Self {
        self.after = after;
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// True when this rule should be scheduled on `os`.
    pub fn applies_to(&self, os: &Os) -> bool {
        os.matches(&self.on)
    }
}
