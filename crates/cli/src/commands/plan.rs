// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bp plan <file|git-url>`: a dry-run preview of what `apply` would do.

use bp_core::Os;
use bp_engine::reconcile;
use bp_parser::{load_blueprint, normalize};
use bp_storage::StateDocument;

use crate::exit_error::ExitError;
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

    // Reconciling in plan mode still performs the eager filesystem cleanup
    // of stale clones/decrypts (§4.6 step 4); persist that before printing
    // so a subsequent `apply` sees the same state a repeated `plan` would.
    if let Err(e) = state.save(home) {
        tracing::warn!(error = %e, "failed to persist state after plan-mode cleanup");
    }

    print!("{}", bp_engine::render_plan(&plan));
    Ok(())
}
