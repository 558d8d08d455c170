// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blueprint file loading: comment/blank-line stripping and `include`
//! resolution with visited-path deduplication.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bp_core::Rule;
use tracing::warn;

use crate::error::ParseError;
use crate::grammar::parse_line;

/// Loads a blueprint file, recursively inlining `include` directives in
/// source order. Each absolute path is loaded at most once; a re-included
/// path is skipped with a warning rather than failing the run.
pub fn load_blueprint(path: &Path) -> Result<Vec<Rule>, ParseError> {
    let mut visited = HashSet::new();
    let mut rules = Vec::new();
    load_into(path, &mut visited, &mut rules, true)?;
    Ok(rules)
}

fn load_into(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    rules: &mut Vec<Rule>,
    is_root: bool,
) -> Result<(), ParseError> {
    let abs = normalize(path);
    if !visited.insert(abs.clone()) {
        warn!(path = %abs.display(), "include cycle or duplicate include, skipping");
        return Ok(());
    }

    let contents = std::fs::read_to_string(&abs).map_err(|source| {
        if is_root {
            ParseError::UnreadableFile { path: abs.clone(), source }
        } else {
            ParseError::UnreadableInclude { path: abs.clone(), source }
        }
    })?;

    let dir = abs.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("include") {
            if rest.starts_with(char::is_whitespace) {
                let included = rest.trim();
                let included_path = resolve_include(&dir, included);
                load_into(&included_path, visited, rules, false)?;
                continue;
            }
        }

        match parse_line(line, line_no) {
            Some(rule) => rules.push(rule),
            None => warn!(path = %abs.display(), line = line_no, "rejected malformed directive"),
        }
    }

    Ok(())
}

fn resolve_include(including_dir: &Path, target: &str) -> PathBuf {
    let target_path = PathBuf::from(target);
    if target_path.is_absolute() {
        target_path
    } else {
        including_dir.join(target_path)
    }
}

/// Absolute path used both for the visited-set and for blueprint identity
/// comparisons against persisted state. Canonicalized when the path exists
/// on disk (resolving symlinks so two different-looking includes of the
/// same file dedupe correctly); falls back to lexical cleaning for paths
/// that don't exist yet.
pub fn normalize(path: &Path) -> PathBuf {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    };
    std::fs::canonicalize(&abs).unwrap_or_else(|_| clean(&abs))
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        use std::path::Component;
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn blank_lines_and_comments_are_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("setup.bp");
        std::fs::write(&path, "\n# a comment\n\ninstall curl\n").unwrap();
        let rules = load_blueprint(&path).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn include_is_inlined_at_point_of_occurrence() {
        let dir = tempdir().unwrap();
        let included = dir.path().join("extra.bp");
        std::fs::write(&included, "install vim\n").unwrap();
        let root = dir.path().join("setup.bp");
        std::fs::write(&root, "install curl\ninclude extra.bp\ninstall git\n").unwrap();

        let rules = load_blueprint(&root).unwrap();
        let names: Vec<_> = rules
            .iter()
            .map(|r| match &r.action {
                bp_core::Action::Install(p) => p.packages[0].name.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["curl", "vim", "git"]);
    }

    #[test]
    fn repeated_include_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let included = dir.path().join("extra.bp");
        std::fs::write(&included, "install vim\n").unwrap();
        let root = dir.path().join("setup.bp");
        std::fs::write(&root, "include extra.bp\ninclude extra.bp\n").unwrap();

        let rules = load_blueprint(&root).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn unreadable_root_file_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.bp");
        assert!(load_blueprint(&missing).is_err());
    }

    #[test]
    fn unreadable_include_is_fatal() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("setup.bp");
        std::fs::write(&root, "include missing.bp\n").unwrap();
        assert!(load_blueprint(&root).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn existing_path_is_canonicalized_so_a_symlinked_include_dedupes() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("extra.bp");
        std::fs::write(&real, "install vim\n").unwrap();
        let link = dir.path().join("extra_link.bp");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let root = dir.path().join("setup.bp");
        std::fs::write(&root, "include extra.bp\ninclude extra_link.bp\n").unwrap();

        let rules = load_blueprint(&root).unwrap();
        assert_eq!(rules.len(), 1, "symlinked and real paths to the same file should dedupe");
    }

    #[test]
    fn relative_blueprint_path_normalizes_against_cwd() {
        let dir = tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("a.bp")).unwrap();
        writeln!(f, "install curl").unwrap();
        let normalized = normalize(&dir.path().join("./sub/../a.bp"));
        assert_eq!(normalized, dir.path().join("a.bp"));
    }
}
