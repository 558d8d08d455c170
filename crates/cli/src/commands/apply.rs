// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bp apply <file|git-url>`: reconciles the blueprint and executes the
//! resulting plan.

use bp_core::Os;
use bp_engine::{drive, reconcile};
use bp_parser::{load_blueprint, normalize};
use bp_shell::{CommandExecutor, SystemExecutor};
use bp_storage::StateDocument;

use crate::exit_error::ExitError;
use crate::reporter::TerminalReporter;
use crate::secret_prompt::TerminalSecretPrompt;
use crate::source;

pub fn handle(
    blueprint_arg: &str,
    skip_group: Option<&str>,
    skip_id: Option<&str>,
    home: &std::path::Path,
) -> Result<(), ExitError> {
    let resolved = source::resolve(blueprint_arg)
        .map_err(|e| ExitError::new(1, format!("failed to resolve blueprint: {e}")))?;
    let blueprint = normalize(resolved.as_path());

    let rules = load_blueprint(&blueprint)
        .map_err(|e| ExitError::new(1, format!("failed to parse blueprint: {e}")))?;

    let os = Os::current();
    let mut state = StateDocument::load(home);
    let plan = reconcile(&rules, &mut state, &os, &blueprint, skip_group, skip_id);
    if let Err(e) = state.save(home) {
        tracing::warn!(error = %e, "failed to persist state after reconcile-time cleanup");
    }

    let make_executor: &dyn Fn(Option<&str>) -> Box<dyn CommandExecutor> = &|sudo_password| {
        let mut executor = SystemExecutor::new();
        if let Some(pw) = sudo_password {
            executor = executor.with_sudo_password(pw);
        }
        Box::new(executor)
    };

    let summary = drive(&plan, home, &os, &blueprint, &TerminalReporter, &TerminalSecretPrompt, make_executor)
        .map_err(|e| ExitError::new(1, e.to_string()))?;

    let errors = summary.records.iter().filter(|r| r.status == bp_storage::ExecutionStatus::Error).count();
    println!(
        "\nrun {}: {} rule(s), {} failed",
        summary.run_number,
        summary.records.len(),
        errors
    );
    Ok(())
}
