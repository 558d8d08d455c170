// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("command failed: {0}")]
    Exec(#[from] bp_shell::ExecError),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no password cached for password-id {0:?}")]
    MissingPassword(String),

    #[error("decryption failed: ciphertext or password incorrect")]
    DecryptionFailed,

    #[error("unsupported os for this action: {0}")]
    UnsupportedOs(String),

    #[error("git operation failed: {0}")]
    Git(String),
}

impl HandlerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
