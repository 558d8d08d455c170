// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bp status`: prints the state document grouped by resource type.

use std::path::Path;

use bp_storage::StateDocument;

use crate::color;

pub fn handle(home: &Path) {
    let state = StateDocument::load(home);

    print_group("packages", state.packages.len(), || {
        for p in &state.packages {
            println!("  {} {} ({}, {})", color::literal(&p.name), p.version, p.os, p.blueprint.display());
        }
    });
    print_group("clones", state.clones.len(), || {
        for c in &state.clones {
            println!(
                "  {} -> {} @ {}",
                color::literal(&c.url),
                c.dest.display(),
                &c.commit[..c.commit.len().min(7)]
            );
        }
    });
    print_group("decrypts", state.decrypts.len(), || {
        for d in &state.decrypts {
            println!("  {} -> {}", d.src.display(), color::literal(&d.dest.display().to_string()));
        }
    });
    print_group("mkdirs", state.mkdirs.len(), || {
        for m in &state.mkdirs {
            println!("  {}", color::literal(&m.path.display().to_string()));
        }
    });
    print_group("known_hosts", state.known_hosts.len(), || {
        for k in &state.known_hosts {
            println!("  {}", color::literal(&k.host));
        }
    });
    print_group("gpg_keys", state.gpg_keys.len(), || {
        for g in &state.gpg_keys {
            println!("  {} ({})", color::literal(&g.keyring), g.deb_url);
        }
    });
}

fn print_group(label: &str, count: usize, render: impl FnOnce()) {
    println!("{} ({count})", color::header(label));
    if count == 0 {
        println!("  {}", color::muted("none"));
    } else {
        render();
    }
    println!();
}
