// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

/// Root of persisted state. `BP_STATE_DIR` overrides `$HOME` for tests;
/// production relies on `$HOME/.blueprint`.
pub fn home_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("BP_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir()
}

/// HTTPS basic-auth username for git clones.
pub fn github_user() -> Option<String> {
    std::env::var("GITHUB_USER").ok().filter(|s| !s.is_empty())
}

/// HTTPS basic-auth token for git clones.
pub fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty())
}

/// The user's login shell, used to pick an rc file for `asdf` integration.
pub fn shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

/// `INFO` (default) or `DEBUG`; `DEBUG` adds command lines to the emitted
/// tracing events (spec.md §6).
pub fn log_level() -> String {
    std::env::var("LOGLEVEL").unwrap_or_else(|_| "INFO".to_string())
}

/// Maps [`log_level`] to a `tracing-subscriber` filter directive.
pub fn tracing_filter() -> &'static str {
    if log_level().eq_ignore_ascii_case("debug") {
        "debug"
    } else {
        "info"
    }
}
