// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decides whether a command string needs a shell and/or sudo handling.

const SHELL_SPECIAL_CHARS: &[char] = &['|', '>', '<', '&', ';', '$', '(', ')', '~', '`'];

/// True when `cmd` contains a character that only a shell would interpret,
/// or is already an explicit `sh -c ...` invocation.
pub fn needs_shell(cmd: &str) -> bool {
    cmd.starts_with("sh -c") || cmd.chars().any(|c| SHELL_SPECIAL_CHARS.contains(&c))
}

/// True when the first token is `sudo`, or the line is a `sh`/`bash`
/// invocation that itself mentions `sudo`.
pub fn needs_sudo(cmd: &str) -> bool {
    let first = cmd.split_whitespace().next().unwrap_or("");
    first == "sudo" || ((first == "sh" || first == "bash") && cmd.contains("sudo"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_and_redirect_require_a_shell() {
        assert!(needs_shell("ls | grep foo"));
        assert!(needs_shell("echo x > /tmp/y"));
    }

    #[test]
    fn plain_command_does_not_require_a_shell() {
        assert!(!needs_shell("apt-get install -y curl"));
    }

    #[test]
    fn leading_sudo_token_needs_sudo() {
        assert!(needs_sudo("sudo apt-get install -y curl"));
    }

    #[test]
    fn embedded_sudo_in_shell_invocation_needs_sudo() {
        assert!(needs_sudo("sh -c 'sudo apt-get update'"));
    }

    #[test]
    fn plain_command_without_sudo_does_not_need_sudo() {
        assert!(!needs_sudo("brew install curl"));
    }
}
