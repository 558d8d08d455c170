// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bp-engine: dependency resolution, drift reconciliation, and the
//! execution driver that turns a parsed rule set into host changes.

pub mod driver;
pub mod error;
pub mod plan;
pub mod reconciler;
pub mod resolver;

pub use driver::{drive, ExecutionSummary, NullReporter, Reporter, SecretPrompt};
pub use error::{DriveError, ReconcileError, ResolveError};
pub use plan::render as render_plan;
pub use reconciler::{reconcile, Plan};
pub use resolver::resolve;

#[cfg(any(test, feature = "test-support"))]
pub use driver::FixedSecretPrompt;
