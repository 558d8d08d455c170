// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution driver's password cache. In-memory only, never
//! persisted, and zeroized on drop so secrets don't linger in memory
//! past the end of a run.

use std::collections::HashMap;

use zeroize::Zeroize;

pub const SUDO_PASSWORD_ID: &str = "sudo";

#[derive(Default)]
pub struct PasswordCache {
    entries: HashMap<String, String>,
}

impl PasswordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, password: impl Into<String>) {
        self.entries.insert(id.into(), password.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }
}

impl Drop for PasswordCache {
    fn drop(&mut self) {
        for value in self.entries.values_mut() {
            value.zeroize();
        }
    }
}
