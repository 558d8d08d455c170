// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-line grammar: tokenize one blueprint line into a [`Rule`].
//!
//! A line the action-specific grammar rejects (missing a required
//! positional or keyword argument) returns `None`. The caller does not
//! abort the parse; the line is dropped. See spec §4.1 / §9 open question.

use std::collections::HashMap;
use std::path::PathBuf;

use bp_core::{
    Action, AsdfPayload, AsdfTool, ClonePayload, DecryptPayload, GpgKeyPayload, InstallPayload,
    KnownHostsPayload, MkdirPayload, Os, Package, Rule, UninstallPayload,
};
use tracing::warn;

/// One parsed token: either a bare positional word or a `key:value` pair.
enum Token<'a> {
    Positional(&'a str),
    Keyword(&'a str, &'a str),
}

/// Splits `rest` on whitespace into words, except whitespace inside a
/// bracketed `key:[...]` value, so `on:[linux, mac]` stays one word.
fn words(rest: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = None;
    let mut depth = 0i32;

    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = (depth - 1).max(0),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                words.push(&rest[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push(&rest[s..]);
    }
    words
}

fn tokenize(rest: &str) -> Vec<Token<'_>> {
    words(rest)
        .into_iter()
        .map(|word| match word.split_once(':') {
            Some((k, v)) if !k.is_empty() => Token::Keyword(k, v),
            _ => Token::Positional(word),
        })
        .collect()
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_on(value: &str) -> Vec<Os> {
    let inner = value.trim_start_matches('[').trim_end_matches(']');
    split_csv(inner).into_iter().map(|tag| Os::from_tag(&tag)).collect()
}

struct Common {
    id: Option<String>,
    after: Vec<String>,
    on: Vec<Os>,
    group: Option<String>,
}

/// Splits tokens into common keyword fields, action-specific keyword map,
/// and positional words, in encounter order.
fn partition<'a>(tokens: Vec<Token<'a>>) -> (Common, HashMap<&'a str, &'a str>, Vec<&'a str>) {
    let mut common = Common { id: None, after: Vec::new(), on: Vec::new(), group: None };
    let mut keywords = HashMap::new();
    let mut positionals = Vec::new();

    for tok in tokens {
        match tok {
            Token::Positional(w) => positionals.push(w),
            Token::Keyword("id", v) => common.id = Some(v.to_string()),
            Token::Keyword("after", v) => common.after = split_csv(v),
            Token::Keyword("on", v) => common.on = parse_on(v),
            Token::Keyword("group", v) => common.group = Some(v.to_string()),
            Token::Keyword(k, v) => {
                keywords.insert(k, v);
            }
        }
    }

    (common, keywords, positionals)
}

fn finish(action: Action, common: Common, line_no: usize) -> Rule {
    let mut rule = Rule::new(action).with_on(common.on).with_after(common.after).with_line(line_no);
    if let Some(id) = common.id {
        let fallback = rule.clone();
        rule = match rule.with_id(id) {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line_no, "{e}, id left unset");
                fallback
            }
        };
    }
    if let Some(group) = common.group {
        let fallback = rule.clone();
        rule = match rule.with_group(group) {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line_no, "{e}, group left unset");
                fallback
            }
        };
    }
    rule
}

/// Parses a single non-blank, non-comment, non-include blueprint line.
///
/// Returns `None` when the action keyword is unrecognized or a required
/// positional/keyword argument for that action is missing; the caller
/// should log and drop the line rather than abort.
pub fn parse_line(line: &str, line_no: usize) -> Option<Rule> {
    let line = line.trim();
    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let (common, keywords, positionals) = partition(tokenize(rest));

    let action = match keyword {
        "install" => {
            if positionals.is_empty() {
                return None;
            }
            Action::Install(InstallPayload {
                packages: positionals.iter().map(|p| Package::parse(p)).collect(),
            })
        }
        "uninstall" => {
            if positionals.is_empty() {
                return None;
            }
            Action::Uninstall(UninstallPayload::Packages(
                positionals.iter().map(|p| Package::parse(p)).collect(),
            ))
        }
        "clone" => {
            let url = *positionals.first()?;
            let dest = PathBuf::from(*keywords.get("to")?);
            let branch = keywords.get("branch").map(|s| s.to_string());
            Action::Clone(ClonePayload { url: url.to_string(), dest, branch })
        }
        "mkdir" => {
            let path = PathBuf::from(*positionals.first()?);
            let mode = match keywords.get("perms") {
                Some(s) => Some(u32::from_str_radix(s, 8).ok()?),
                None => None,
            };
            Action::Mkdir(MkdirPayload { path, mode })
        }
        "decrypt" => {
            let src = PathBuf::from(*positionals.first()?);
            let dest = PathBuf::from(*keywords.get("to")?);
            let password_id = keywords.get("password-id").map(|s| s.to_string());
            Action::Decrypt(DecryptPayload::new(src, dest, password_id))
        }
        "known_hosts" => {
            let host = (*positionals.first()?).to_string();
            let key_type = keywords.get("key").map(|s| s.to_string());
            Action::KnownHosts(KnownHostsPayload { host, key_type })
        }
        "gpg-key" => {
            let key_url = (*positionals.first()?).to_string();
            let keyring = (*keywords.get("keyring")?).to_string();
            let deb_url = (*keywords.get("deb-url")?).to_string();
            Action::GpgKey(GpgKeyPayload { key_url, keyring, deb_url })
        }
        "asdf" => {
            if positionals.is_empty() {
                return None;
            }
            let tools: Option<Vec<AsdfTool>> =
                positionals.iter().map(|p| AsdfTool::parse(p)).collect();
            Action::Asdf(AsdfPayload { tools: tools? })
        }
        _ => return None,
    };

    Some(finish(action, common, line_no))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_requires_at_least_one_package() {
        assert!(parse_line("install", 1).is_none());
        assert!(parse_line("install curl", 1).is_some());
    }

    #[test]
    fn install_parses_multiple_packages_with_versions() {
        let rule = parse_line("install curl node@20.11.0", 1).unwrap();
        match rule.action {
            Action::Install(p) => {
                assert_eq!(p.packages[0].name, "curl");
                assert_eq!(p.packages[1].version, "20.11.0");
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn clone_requires_to_keyword() {
        assert!(parse_line("clone https://example.com/repo.git", 1).is_none());
        let rule = parse_line("clone https://example.com/repo.git to:~/r branch:main", 1).unwrap();
        match rule.action {
            Action::Clone(p) => {
                assert_eq!(p.url, "https://example.com/repo.git");
                assert_eq!(p.dest, PathBuf::from("~/r"));
                assert_eq!(p.branch.as_deref(), Some("main"));
            }
            _ => panic!("expected clone"),
        }
    }

    #[test]
    fn mkdir_parses_octal_perms() {
        let rule = parse_line("mkdir /tmp/a perms:755", 1).unwrap();
        match rule.action {
            Action::Mkdir(p) => assert_eq!(p.mode, Some(0o755)),
            _ => panic!("expected mkdir"),
        }
    }

    #[test]
    fn mkdir_rejects_non_octal_perms() {
        assert!(parse_line("mkdir /tmp/a perms:999", 1).is_none());
    }

    #[test]
    fn decrypt_defaults_password_id() {
        let rule = parse_line("decrypt s.enc to:/tmp/a/s", 1).unwrap();
        match rule.action {
            Action::Decrypt(p) => assert_eq!(p.password_id, "default"),
            _ => panic!("expected decrypt"),
        }
    }

    #[test]
    fn gpg_key_requires_keyring_and_deb_url() {
        assert!(parse_line("gpg-key https://example.com/key.gpg", 1).is_none());
        let rule =
            parse_line("gpg-key https://example.com/key.gpg keyring:docker deb-url:https://example.com/deb", 1)
                .unwrap();
        assert_eq!(rule.action.tag(), "gpg-key");
    }

    #[test]
    fn on_list_trims_whitespace_and_parses_csv() {
        let rule = parse_line("install curl on:[linux, mac]", 1).unwrap();
        assert_eq!(rule.on, vec![Os::Linux, Os::Mac]);
    }

    #[test]
    fn on_list_with_internal_spaces_does_not_leak_a_stray_positional() {
        let rule = parse_line("install curl on:[linux, mac]", 1).unwrap();
        match rule.action {
            Action::Install(p) => assert_eq!(p.packages.len(), 1),
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn after_list_parses_csv() {
        let rule = parse_line("install curl after:a,b", 1).unwrap();
        assert_eq!(rule.after, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn unknown_action_keyword_is_dropped() {
        assert!(parse_line("frobnicate x", 1).is_none());
    }

    #[test]
    fn asdf_rejects_bare_plugin_without_version() {
        assert!(parse_line("asdf nodejs", 1).is_none());
        assert!(parse_line("asdf nodejs@20.11.0", 1).is_some());
    }

    #[test]
    fn id_containing_a_colon_is_warned_and_left_unset() {
        let rule = parse_line("install curl id:has:colon", 1).unwrap();
        assert_eq!(rule.id, None);
    }
}
