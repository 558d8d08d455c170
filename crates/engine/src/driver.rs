// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs an ordered plan against the host: prompts for secrets up front,
//! drives each handler through the command executor, and records the
//! run's output to history (C7).

use std::path::Path;

use bp_core::{Action, Os};
use bp_handlers::{
    running_as_root, AnyHandler, Handler, HandlerContext, PasswordCache, ShellGitClient,
    SUDO_PASSWORD_ID,
};
use bp_shell::CommandExecutor;
use bp_storage::{
    history, process_state, ExecutionRecord, ExecutionStatus, ProcessState, StateDocument,
    StateLock,
};
use chrono::Utc;

use crate::error::DriveError;
use crate::reconciler::Plan;
use crate::resolver;

/// Prompts the user for a secret, given a human-readable label. The
/// terminal is a presentation concern left to the CLI; this trait is the
/// seam the driver depends on instead.
pub trait SecretPrompt {
    fn prompt(&self, label: &str) -> Result<String, DriveError>;
}

/// Narrates progress as the driver works through the plan. The default
/// `NullReporter` is silent; the CLI supplies a terminal-writing one.
pub trait Reporter {
    fn rule_header(&self, index: usize, total: usize, action: &str, detail: &str);
    fn rule_failed(&self, index: usize, total: usize, error: &str);
}

#[derive(Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn rule_header(&self, _index: usize, _total: usize, _action: &str, _detail: &str) {}
    fn rule_failed(&self, _index: usize, _total: usize, _error: &str) {}
}

pub struct ExecutionSummary {
    pub records: Vec<ExecutionRecord>,
    pub run_number: u64,
}

/// Executes `plan` against `home`. Acquires the state lock for the whole
/// run, so concurrent invocations against the same home directory block
/// on each other rather than corrupting state (closing the gap spec.md
/// §9 flags as unaddressed in the original).
///
/// `make_executor` is handed the cached sudo password, if one was
/// prompted for, and builds the command executor the run should use —
/// production callers construct a `SystemExecutor`; tests inject a
/// `FakeExecutor`.
pub fn drive(
    plan: &Plan,
    home: &Path,
    os: &Os,
    blueprint: &Path,
    reporter: &dyn Reporter,
    secrets: &dyn SecretPrompt,
    make_executor: &dyn Fn(Option<&str>) -> Box<dyn CommandExecutor>,
) -> Result<ExecutionSummary, DriveError> {
    let _lock = StateLock::acquire(home)?;
    let mut state = StateDocument::load(home);

    let merged = plan.merged();
    let sorted = resolver::resolve(&merged)?;

    let mut passwords = PasswordCache::new();
    let needs_sudo = sorted.iter().any(|r| AnyHandler::for_rule(r).requires_sudo(os));
    if needs_sudo && !matches!(os, Os::Mac) && !running_as_root() {
        let pw = secrets.prompt("sudo password")?;
        passwords.insert(SUDO_PASSWORD_ID, pw);
    }

    let mut password_ids: Vec<String> = sorted
        .iter()
        .filter_map(|r| match &r.action {
            Action::Decrypt(p) => Some(p.password_id.clone()),
            _ => None,
        })
        .collect();
    password_ids.sort();
    password_ids.dedup();
    for id in password_ids {
        if !passwords.contains(&id) {
            let pw = secrets.prompt(&format!("password for {id}"))?;
            passwords.insert(id, pw);
        }
    }

    let executor = make_executor(passwords.get(SUDO_PASSWORD_ID));
    let git = ShellGitClient::new(executor.as_ref());
    let ctx = HandlerContext {
        base_dir: blueprint.parent().unwrap_or_else(|| Path::new(".")),
        home,
        os,
        executor: executor.as_ref(),
        passwords: &passwords,
        git: &git,
    };

    let run_number = history::next_run_number(home)?;
    let started_at = Utc::now();
    let total = sorted.len();
    let mut records = Vec::with_capacity(total);

    for (index, rule) in sorted.iter().enumerate() {
        let handler = AnyHandler::for_rule(rule);
        let detail_preview = handler.display_summary();
        reporter.rule_header(index, total, rule.action.tag(), &detail_preview);

        let ps = ProcessState {
            pid: std::process::id(),
            blueprint: blueprint.to_path_buf(),
            os: os.tag().to_string(),
            total_rules: total,
            current_rule: index,
            current_action: rule.action.tag().to_string(),
            current_detail: detail_preview.clone(),
            started_at,
            rule_started_at: Utc::now(),
        };
        if let Err(e) = ps.write(home) {
            tracing::warn!(error = %e, "failed to write process state, continuing");
        }

        let command_preview = handler.command_preview(&ctx, false);
        let record = match handler.apply(&ctx) {
            Ok(outcome) => {
                handler.update_state(&mut state, &outcome, blueprint, os, false);
                if let Err(e) = history::write_step_output(home, run_number, index, &outcome.stdout, &outcome.stderr) {
                    tracing::warn!(error = %e, "failed to write step output");
                }
                ExecutionRecord {
                    timestamp: Utc::now(),
                    blueprint: blueprint.to_path_buf(),
                    os: os.tag().to_string(),
                    command_preview,
                    status: ExecutionStatus::Success,
                    output: outcome.combined_output(),
                    error_message: None,
                }
            }
            Err(e) => {
                reporter.rule_failed(index, total, &e.to_string());
                if let Err(write_err) = history::write_step_output(home, run_number, index, "", &e.to_string()) {
                    tracing::warn!(error = %write_err, "failed to write step output for failed rule");
                }
                ExecutionRecord {
                    timestamp: Utc::now(),
                    blueprint: blueprint.to_path_buf(),
                    os: os.tag().to_string(),
                    command_preview,
                    status: ExecutionStatus::Error,
                    output: String::new(),
                    error_message: Some(e.to_string()),
                }
            }
        };
        records.push(record);

        if let Err(e) = state.save(home) {
            tracing::warn!(error = %e, "failed to persist state after rule, continuing");
        }
    }

    if let Err(e) = history::append_history(home, &records) {
        tracing::warn!(error = %e, "failed to append run history");
    }
    if let Err(e) = process_state::remove(home) {
        tracing::warn!(error = %e, "failed to remove process state after run");
    }

    Ok(ExecutionSummary { records, run_number })
}

#[cfg(any(test, feature = "test-support"))]
pub struct FixedSecretPrompt(pub String);

#[cfg(any(test, feature = "test-support"))]
impl SecretPrompt for FixedSecretPrompt {
    fn prompt(&self, _label: &str) -> Result<String, DriveError> {
        Ok(self.0.clone())
    }
}
