// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bp encrypt <file> [--password-id <id>]`: prompts for a password,
//! AEAD-seals the file, and writes `<file>.enc` alongside it.

use std::path::Path;

use bp_handlers::seal;
use dialoguer::Password;

use crate::exit_error::ExitError;

pub fn handle(file: &Path, password_id: Option<&str>) -> Result<(), ExitError> {
    let plaintext = std::fs::read(file)
        .map_err(|e| ExitError::new(1, format!("failed to read {}: {e}", file.display())))?;

    let password = Password::new()
        .with_prompt("password")
        .with_confirmation("confirm password", "passwords did not match")
        .interact()
        .map_err(|e| ExitError::new(1, format!("password prompt failed: {e}")))?;

    let sealed = seal(&plaintext, &password)
        .map_err(|e| ExitError::new(1, format!("failed to seal {}: {e}", file.display())))?;

    let dest = file.with_extension(match file.extension() {
        Some(ext) => format!("{}.enc", ext.to_string_lossy()),
        None => "enc".to_string(),
    });
    std::fs::write(&dest, sealed)
        .map_err(|e| ExitError::new(1, format!("failed to write {}: {e}", dest.display())))?;

    let id = password_id.unwrap_or(bp_core::DEFAULT_PASSWORD_ID);
    println!("wrote {} (password-id: {id})", dest.display());
    Ok(())
}
