// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bp-handlers: the concrete effect for each of the eight action kinds —
//! install/uninstall, clone, mkdir, decrypt, known_hosts, gpg-key, asdf —
//! plus their shared dependencies (command execution, git, sealed-file
//! crypto, sudo password caching).

pub mod asdf;
pub mod clone;
pub mod crypto;
pub mod decrypt;
pub mod error;
pub mod git_client;
pub mod gpg_key;
pub mod handler;
pub mod install;
pub mod known_hosts;
pub mod mkdir;
pub mod password_cache;
pub mod registry;
pub mod util;

pub use crypto::{open, seal};
pub use error::HandlerError;
pub use git_client::{GitClient, ShellGitClient, SyncResult};
pub use handler::{running_as_root, ExpectedOutputDetails, Handler, HandlerContext, HandlerOutcome, RequiresSudo};
pub use install::{InstallHandler, UninstallHandler};
pub use password_cache::{PasswordCache, SUDO_PASSWORD_ID};
pub use registry::AnyHandler;

pub use asdf::AsdfHandler;
pub use clone::{remove_clone_dir, CloneHandler};
pub use decrypt::{remove_decrypted_file, DecryptHandler};
pub use gpg_key::GpgKeyHandler;
pub use known_hosts::KnownHostsHandler;
pub use mkdir::MkdirHandler;
