// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs for the `bp` binary, one file per scenario.

mod support;

mod specs {
    mod clone_idempotence;
    mod cycle_detection;
    mod dependency_ordering;
    mod drift_convergence;
    mod history_layout;
    mod skip_bypasses_cleanup;
}
