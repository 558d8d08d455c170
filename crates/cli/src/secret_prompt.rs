// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal `SecretPrompt` implementation: a hidden-input password prompt.
//! A failed prompt (e.g. no terminal attached) is fatal for the run
//! (`SecretError`, spec.md §7).

use bp_engine::{DriveError, SecretPrompt};
use dialoguer::Password;

pub struct TerminalSecretPrompt;

impl SecretPrompt for TerminalSecretPrompt {
    fn prompt(&self, label: &str) -> Result<String, DriveError> {
        Password::new()
            .with_prompt(label.to_string())
            .interact()
            .map_err(|e| DriveError::SecretPrompt(e.to_string()))
    }
}
