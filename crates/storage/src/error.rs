// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} escapes the blueprint state directory")]
    PathTraversal(PathBuf),

    #[error("malformed state document: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to acquire state store lock: {0}")]
    Lock(#[source] std::io::Error),

    #[error("state store is locked by another blueprint process")]
    Locked,
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
