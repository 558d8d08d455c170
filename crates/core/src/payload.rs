// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action-specific payloads carried by a [`crate::rule::Rule`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::package::Package;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPayload {
    pub packages: Vec<Package>,
}

/// The resource class an `uninstall` rule targets.
///
/// `Packages` is the only variant the parser produces directly from an
/// `uninstall <pkg>…` line; the other variants are synthesized by the
/// reconciler's drift detection for resource-creating handlers other than
/// install (clone/decrypt/mkdir/known_hosts/gpg-key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UninstallPayload {
    Packages(Vec<Package>),
    ClonePath(PathBuf),
    DecryptPath(PathBuf),
    MkdirPath(PathBuf),
    KnownHost(String),
    GpgKeyring(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonePayload {
    pub url: String,
    pub dest: PathBuf,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkdirPayload {
    pub path: PathBuf,
    /// Octal file mode, e.g. `0o755`.
    pub mode: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptPayload {
    pub src: PathBuf,
    pub dest: PathBuf,
    pub password_id: String,
}

pub const DEFAULT_PASSWORD_ID: &str = "default";

impl DecryptPayload {
    pub fn new(src: PathBuf, dest: PathBuf, password_id: Option<String>) -> Self {
        Self { src, dest, password_id: password_id.unwrap_or_else(|| DEFAULT_PASSWORD_ID.to_string()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownHostsPayload {
    pub host: String,
    pub key_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpgKeyPayload {
    pub key_url: String,
    pub keyring: String,
    pub deb_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsdfTool {
    pub plugin: String,
    pub version: String,
}

impl AsdfTool {
    /// Parses a positional `plugin@version` token.
    pub fn parse(token: &str) -> Option<Self> {
        let (plugin, version) = token.split_once('@')?;
        if plugin.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self { plugin: plugin.to_string(), version: version.to_string() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsdfPayload {
    pub tools: Vec<AsdfTool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asdf_tool_requires_both_halves() {
        assert!(AsdfTool::parse("nodejs@20.11.0").is_some());
        assert!(AsdfTool::parse("nodejs").is_none());
        assert!(AsdfTool::parse("@20").is_none());
        assert!(AsdfTool::parse("nodejs@").is_none());
    }

    #[test]
    fn decrypt_payload_defaults_password_id() {
        let p = DecryptPayload::new("s.enc".into(), "s".into(), None);
        assert_eq!(p.password_id, "default");
    }
}
