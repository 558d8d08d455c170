// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use bp_core::{Action, AsdfPayload, AsdfTool, Os, Rule};
use bp_storage::StateDocument;

use crate::error::HandlerError;
use crate::handler::{Handler, HandlerContext, HandlerOutcome};

const ASDF_DIR: &str = ".asdf";
const MARKER_BEGIN: &str = "# asdf initialization";
const MARKER_END: &str = "# end asdf initialization";

pub struct AsdfHandler {
    pub payload: AsdfPayload,
}

impl AsdfHandler {
    pub fn new(payload: AsdfPayload) -> Self {
        Self { payload }
    }
}

fn asdf_dir(home: &Path) -> PathBuf {
    home.join(ASDF_DIR)
}

/// The rc file to patch, derived from the `$SHELL` the rule is applying
/// under. Defaults to bash's profile when `$SHELL` is unset or unrecognized.
fn rc_file(home: &Path) -> (PathBuf, &'static str) {
    let shell = std::env::var("SHELL").unwrap_or_default();
    if shell.ends_with("fish") {
        (home.join(".config/fish/config.fish"), "source {asdf_dir}/asdf.fish")
    } else if shell.ends_with("zsh") {
        (home.join(".zshrc"), ". {asdf_dir}/asdf.sh")
    } else {
        (home.join(".bashrc"), ". {asdf_dir}/asdf.sh")
    }
}

fn rc_block(home: &Path) -> String {
    let (_, template) = rc_file(home);
    let line = template.replace("{asdf_dir}", &asdf_dir(home).display().to_string());
    format!("{MARKER_BEGIN}\n{line}\n{MARKER_END}\n")
}

fn ensure_rc_block(home: &Path) -> Result<(), HandlerError> {
    let (path, _) = rc_file(home);
    let existing = std::fs::read_to_string(&path).unwrap_or_default();
    if existing.contains(MARKER_BEGIN) {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| HandlerError::io(parent, e))?;
    }
    let mut contents = existing;
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&rc_block(home));
    std::fs::write(&path, contents).map_err(|e| HandlerError::io(&path, e))
}

fn remove_rc_block(home: &Path) -> Result<(), HandlerError> {
    let (path, _) = rc_file(home);
    let existing = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(HandlerError::io(&path, e)),
    };

    let mut out = String::new();
    let mut in_block = false;
    for line in existing.lines() {
        if line.trim() == MARKER_BEGIN {
            in_block = true;
            continue;
        }
        if line.trim() == MARKER_END {
            in_block = false;
            continue;
        }
        if !in_block {
            out.push_str(line);
            out.push('\n');
        }
    }
    std::fs::write(&path, out).map_err(|e| HandlerError::io(&path, e))
}

impl Handler for AsdfHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let dir = asdf_dir(ctx.home);
        if !dir.exists() {
            let out = ctx.executor.execute(&format!(
                "git clone https://github.com/asdf-vm/asdf.git {} --branch v0.14.0",
                dir.display()
            ))?;
            if !out.success {
                return Err(HandlerError::Git(format!("failed to install asdf: {}", out.stderr)));
            }
        }
        ensure_rc_block(ctx.home)?;

        for tool in &self.payload.tools {
            install_tool(ctx, &dir, tool)?;
        }

        Ok(HandlerOutcome {
            detail: format!("asdf ({} tools)", self.payload.tools.len()),
            ..Default::default()
        })
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let dir = asdf_dir(ctx.home);
        if dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                tracing::warn!(path = %dir.display(), error = %e, "failed to remove asdf directory");
            }
        }
        remove_rc_block(ctx.home)?;
        Ok(HandlerOutcome { detail: "removed asdf".to_string(), ..Default::default() })
    }

    fn command_preview(&self, ctx: &HandlerContext, is_revert: bool) -> String {
        let dir = asdf_dir(ctx.home);
        if is_revert {
            format!("rm -rf {}", dir.display())
        } else {
            let tools = self
                .payload
                .tools
                .iter()
                .map(|t| format!("{}@{}", t.plugin, t.version))
                .collect::<Vec<_>>()
                .join(", ");
            format!("asdf install {tools}")
        }
    }

    fn display_summary(&self) -> String {
        let tools = self
            .payload
            .tools
            .iter()
            .map(|t| format!("{}@{}", t.plugin, t.version))
            .collect::<Vec<_>>()
            .join(" ");
        format!("asdf {tools}")
    }

    fn dependency_key(&self) -> String {
        self.payload
            .tools
            .first()
            .map(|t| t.plugin.clone())
            .unwrap_or_else(|| "asdf".to_string())
    }

    fn find_stale_in_state(
        &self,
        _state: &StateDocument,
        _current_rules: &[Rule],
        _blueprint: &Path,
        _os: &Os,
    ) -> Vec<Rule> {
        // asdf tool versions are not independently tracked in persisted
        // state (spec §4.8: no automatic per-tool uninstall on drift).
        Vec::new()
    }

    fn update_state(
        &self,
        _state: &mut StateDocument,
        _outcome: &HandlerOutcome,
        _blueprint: &Path,
        _os: &Os,
        _is_revert: bool,
    ) {
    }
}

fn install_tool(ctx: &HandlerContext, asdf_dir: &Path, tool: &AsdfTool) -> Result<(), HandlerError> {
    let source = format!(". {}/asdf.sh", asdf_dir.display());
    let plugin_add = ctx.executor.execute(&format!(
        "sh -c '{source} && asdf plugin add {} 2>/dev/null; asdf install {} {} && asdf global {} {}'",
        tool.plugin, tool.plugin, tool.version, tool.plugin, tool.version
    ))?;
    if !plugin_add.success {
        return Err(HandlerError::Git(format!(
            "failed to install {}@{}: {}",
            tool.plugin, tool.version, plugin_add.stderr
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rc_block_contains_markers_and_asdf_dir() {
        let home = PathBuf::from("/home/alice");
        std::env::set_var("SHELL", "/bin/bash");
        let block = rc_block(&home);
        assert!(block.starts_with(MARKER_BEGIN));
        assert!(block.contains("/home/alice/.asdf/asdf.sh"));
        assert!(block.trim_end().ends_with(MARKER_END));
    }

    #[test]
    fn dependency_key_uses_first_tool_plugin() {
        let handler = AsdfHandler::new(AsdfPayload {
            tools: vec![
                AsdfTool { plugin: "nodejs".into(), version: "20.11.0".into() },
                AsdfTool { plugin: "python".into(), version: "3.12.0".into() },
            ],
        });
        assert_eq!(handler.dependency_key(), "nodejs");
    }
}
