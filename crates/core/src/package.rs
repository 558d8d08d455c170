// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `{name, version}` package reference used by install/uninstall rules.

use serde::{Deserialize, Serialize};

pub const DEFAULT_VERSION: &str = "latest";

/// A package name with an optional version, as named in an `install`/`uninstall` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), version: DEFAULT_VERSION.to_string() }
    }

    pub fn with_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into() }
    }

    /// Parses a positional install token, splitting an optional `@version` suffix.
    pub fn parse(token: &str) -> Self {
        match token.split_once('@') {
            Some((name, version)) if !version.is_empty() => {
                Self::with_version(name, version)
            }
            _ => Self::new(token),
        }
    }
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version == DEFAULT_VERSION {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.version)
        }
    }
}
