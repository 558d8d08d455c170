// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The host OS tag used for `on:[...]` filtering and package-manager selection.

use serde::{Deserialize, Serialize};

/// Coarse OS classification a rule's `on:` list can reference.
///
/// Matches the reconciler's tag derivation: darwin -> `mac`, linux -> `linux`,
/// windows -> `windows`, anything else -> the raw platform string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Mac,
    Linux,
    Windows,
    Other(String),
}

impl Os {
    /// The OS tag for the host this process is running on.
    pub fn current() -> Self {
        Self::from_platform(std::env::consts::OS)
    }

    /// Maps a Rust `std::env::consts::OS` value to the engine's tag scheme.
    pub fn from_platform(platform: &str) -> Self {
        match platform {
            "macos" => Os::Mac,
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            other => Os::Other(other.to_string()),
        }
    }

    /// Parses a tag as it appears in an `on:[...]` list or in persisted state.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "mac" => Os::Mac,
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            other => Os::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Os::Mac => "mac",
            Os::Linux => "linux",
            Os::Windows => "windows",
            Os::Other(s) => s,
        }
    }

    /// True when `filters` is empty (applies to every OS) or contains `self`.
    pub fn matches(&self, filters: &[Os]) -> bool {
        filters.is_empty() || filters.contains(self)
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_list_matches_every_os() {
        assert!(Os::Linux.matches(&[]));
        assert!(Os::Mac.matches(&[]));
    }

    #[test]
    fn nonempty_filter_list_requires_membership() {
        assert!(Os::Linux.matches(&[Os::Linux, Os::Mac]));
        assert!(!Os::Windows.matches(&[Os::Linux, Os::Mac]));
    }

    #[test]
    fn platform_mapping_matches_reconciler_tags() {
        assert_eq!(Os::from_platform("macos").tag(), "mac");
        assert_eq!(Os::from_platform("linux").tag(), "linux");
        assert_eq!(Os::from_platform("windows").tag(), "windows");
        assert_eq!(Os::from_platform("freebsd").tag(), "freebsd");
    }

    #[test]
    fn tag_round_trips_through_from_tag() {
        for os in [Os::Mac, Os::Linux, Os::Windows, Os::Other("freebsd".into())] {
            assert_eq!(Os::from_tag(os.tag()), os);
        }
    }
}
