// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Small helpers shared across handlers.

use std::path::{Path, PathBuf};

/// Expands a leading `~` (or `~/...`) to the home directory. A bare path
/// with no `~` prefix is returned unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(stripped) = path.to_str().and_then(|s| s.strip_prefix('~')) else {
        return path.to_path_buf();
    };
    let home = dirs::home_dir().unwrap_or_default();
    if stripped.is_empty() {
        home
    } else {
        home.join(stripped.trim_start_matches('/'))
    }
}

/// Resolves a (possibly relative, possibly `~`-prefixed) path against
/// `base_dir`, the directory the owning blueprint was loaded from.
pub fn resolve_against(base_dir: &Path, path: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tilde_expands_to_home() {
        let home = dirs::home_dir().unwrap_or_default();
        assert_eq!(expand_tilde(Path::new("~")), home);
    }

    #[test]
    fn tilde_prefixed_path_joins_home() {
        let home = dirs::home_dir().unwrap_or_default();
        assert_eq!(expand_tilde(Path::new("~/r")), home.join("r"));
    }

    #[test]
    fn path_without_tilde_is_unchanged() {
        assert_eq!(expand_tilde(Path::new("/tmp/a")), PathBuf::from("/tmp/a"));
    }

    #[test]
    fn relative_path_resolves_against_base_dir() {
        let base = Path::new("/blueprints/project");
        assert_eq!(resolve_against(base, Path::new("s.enc")), base.join("s.enc"));
    }

    #[test]
    fn absolute_path_ignores_base_dir() {
        let base = Path::new("/blueprints/project");
        assert_eq!(resolve_against(base, Path::new("/abs/s.enc")), PathBuf::from("/abs/s.enc"));
    }
}
