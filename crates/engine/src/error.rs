// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("cyclic dependency detected at rule {0:?}")]
    CyclicDependency(String),
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Storage(#[from] bp_storage::StorageError),
}

#[derive(Debug, Error)]
pub enum DriveError {
    #[error(transparent)]
    Storage(#[from] bp_storage::StorageError),

    #[error(transparent)]
    Handler(#[from] bp_handlers::HandlerError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("secret prompt failed: {0}")]
    SecretPrompt(String),
}
