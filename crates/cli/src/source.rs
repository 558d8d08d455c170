// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the `<file|git-url>` argument shared by `plan`/`apply`: a local
//! path is used as-is; a git URL is cloned to a temporary directory that is
//! removed when the resolved blueprint goes out of scope (spec.md §6).

use std::path::{Path, PathBuf};

use bp_handlers::{GitClient, ShellGitClient};
use bp_shell::SystemExecutor;
use tempfile::TempDir;

const DEFAULT_BLUEPRINT_FILE: &str = "setup.bp";

/// True when `arg` looks like a git remote rather than a local path:
/// `git@`, `http(s)://`, or a `.git` suffix anywhere in the string.
pub fn looks_like_git_url(arg: &str) -> bool {
    arg.starts_with("git@") || arg.starts_with("http://") || arg.starts_with("https://") || arg.contains(".git")
}

/// A resolved blueprint path, holding onto a temp directory (if any) so it
/// isn't cleaned up until the caller is done with the path.
pub struct ResolvedBlueprint {
    pub path: PathBuf,
    _temp: Option<TempDir>,
}

/// Splits `<url>[@branch][:path/inside/repo.bp]` into its three parts.
///
/// The split anchors on the `.git` suffix, which both forms of git URL
/// (`https://host/org/repo.git`, `git@host:org/repo.git`) share — this
/// avoids ambiguity with the `:` in `https://` and the `@` in `git@host`,
/// both of which appear before that anchor. A URL with no `.git` suffix
/// is returned as-is, with no `@branch`/`:path` suffix support.
fn split_git_arg(arg: &str) -> (&str, Option<&str>, Option<&str>) {
    let Some(git_end) = arg.find(".git").map(|i| i + 4) else {
        return (arg, None, None);
    };
    let (url, suffix) = arg.split_at(git_end);

    let (after_branch, path) = match suffix.find(':') {
        Some(idx) => (&suffix[..idx], Some(&suffix[idx + 1..])),
        None => (suffix, None),
    };
    let branch = after_branch.strip_prefix('@');
    (url, branch, path)
}

/// Resolves the blueprint argument to a local file path, cloning it first
/// if it names a git repository.
pub fn resolve(arg: &str) -> anyhow::Result<ResolvedBlueprint> {
    if !looks_like_git_url(arg) {
        return Ok(ResolvedBlueprint { path: PathBuf::from(arg), _temp: None });
    }

    let (url, branch, sub_path) = split_git_arg(arg);
    let temp = TempDir::new()?;
    let dest = temp.path().join("repo");

    let executor = SystemExecutor::new();
    let git = ShellGitClient::new(&executor);
    git.clone_fresh(url, &dest, branch)
        .map_err(|e| anyhow::anyhow!("failed to clone {url}: {e}"))?;

    let file = sub_path.unwrap_or(DEFAULT_BLUEPRINT_FILE);
    let path = dest.join(file);
    Ok(ResolvedBlueprint { path, _temp: Some(temp) })
}

impl ResolvedBlueprint {
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}
