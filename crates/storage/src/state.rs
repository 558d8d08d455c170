// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted `StateDocument`: seven parallel sequences of resources the
//! engine has created, one per resource-creating handler.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::paths::{self, guarded_path, STATUS_FILE};

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    pub version: String,
    pub blueprint: PathBuf,
    pub os: String,
    pub installed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneEntry {
    pub dest: PathBuf,
    pub url: String,
    pub commit: String,
    pub blueprint: PathBuf,
    pub os: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptEntry {
    pub dest: PathBuf,
    pub src: PathBuf,
    pub password_id: String,
    pub blueprint: PathBuf,
    pub os: String,
    pub decrypted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkdirEntry {
    pub path: PathBuf,
    pub mode: Option<u32>,
    pub blueprint: PathBuf,
    pub os: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownHostEntry {
    pub host: String,
    pub blueprint: PathBuf,
    pub os: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpgKeyEntry {
    pub keyring: String,
    pub deb_url: String,
    pub blueprint: PathBuf,
    pub os: String,
    pub added_at: DateTime<Utc>,
}

/// Per-user persistent state. Every entry records a resource the engine
/// successfully created and has not recorded as removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
    #[serde(default)]
    pub clones: Vec<CloneEntry>,
    #[serde(default)]
    pub decrypts: Vec<DecryptEntry>,
    #[serde(default)]
    pub mkdirs: Vec<MkdirEntry>,
    #[serde(default)]
    pub known_hosts: Vec<KnownHostEntry>,
    #[serde(default)]
    pub gpg_keys: Vec<GpgKeyEntry>,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

impl StateDocument {
    pub fn new() -> Self {
        Self { version: CURRENT_VERSION, ..Default::default() }
    }

    fn status_path(home: &Path) -> Result<PathBuf, StorageError> {
        guarded_path(home, STATUS_FILE)
    }

    /// Loads the state document; a missing or corrupt file is treated as
    /// "no state" per the error-handling policy (§7: state read errors are
    /// not fatal).
    pub fn load(home: &Path) -> Self {
        match Self::try_load(home) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "state document unreadable, treating as empty");
                Self::new()
            }
        }
    }

    pub fn try_load(home: &Path) -> Result<Self, StorageError> {
        let path = Self::status_path(home)?;
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(StorageError::io(&path, e)),
        };
        serde_json::from_slice(&bytes).map_err(StorageError::Corrupt)
    }

    pub fn save(&self, home: &Path) -> Result<(), StorageError> {
        paths::ensure_base_dir(home)?;
        let path = Self::status_path(home)?;
        let bytes = serde_json::to_vec_pretty(self).map_err(StorageError::Corrupt)?;
        paths::write_file(&path, &bytes)
    }

    pub fn upsert_package(&mut self, entry: PackageEntry) {
        self.packages.retain(|e| {
            !(e.name == entry.name && e.blueprint == entry.blueprint && e.os == entry.os)
        });
        self.packages.push(entry);
    }

    pub fn remove_package(&mut self, name: &str, blueprint: &Path, os: &str) {
        self.packages.retain(|e| !(e.name == name && e.blueprint == blueprint && e.os == os));
    }

    pub fn upsert_clone(&mut self, entry: CloneEntry) {
        self.clones.retain(|e| {
            !(e.dest == entry.dest && e.blueprint == entry.blueprint && e.os == entry.os)
        });
        self.clones.push(entry);
    }

    pub fn remove_clone(&mut self, dest: &Path, blueprint: &Path, os: &str) {
        self.clones.retain(|e| !(e.dest == dest && e.blueprint == blueprint && e.os == os));
    }

    pub fn upsert_decrypt(&mut self, entry: DecryptEntry) {
        self.decrypts.retain(|e| {
            !(e.dest == entry.dest && e.blueprint == entry.blueprint && e.os == entry.os)
        });
        self.decrypts.push(entry);
    }

    pub fn remove_decrypt(&mut self, dest: &Path, blueprint: &Path, os: &str) {
        self.decrypts.retain(|e| !(e.dest == dest && e.blueprint == blueprint && e.os == os));
    }

    pub fn upsert_mkdir(&mut self, entry: MkdirEntry) {
        self.mkdirs.retain(|e| {
            !(e.path == entry.path && e.blueprint == entry.blueprint && e.os == entry.os)
        });
        self.mkdirs.push(entry);
    }

    pub fn remove_mkdir(&mut self, path: &Path, blueprint: &Path, os: &str) {
        self.mkdirs.retain(|e| !(e.path == path && e.blueprint == blueprint && e.os == os));
    }

    pub fn upsert_known_host(&mut self, entry: KnownHostEntry) {
        self.known_hosts.retain(|e| {
            !(e.host == entry.host && e.blueprint == entry.blueprint && e.os == entry.os)
        });
        self.known_hosts.push(entry);
    }

    pub fn remove_known_host(&mut self, host: &str, blueprint: &Path, os: &str) {
        self.known_hosts.retain(|e| !(e.host == host && e.blueprint == blueprint && e.os == os));
    }

    pub fn upsert_gpg_key(&mut self, entry: GpgKeyEntry) {
        self.gpg_keys.retain(|e| {
            !(e.keyring == entry.keyring && e.blueprint == entry.blueprint && e.os == entry.os)
        });
        self.gpg_keys.push(entry);
    }

    pub fn remove_gpg_key(&mut self, keyring: &str, blueprint: &Path, os: &str) {
        self.gpg_keys.retain(|e| !(e.keyring == keyring && e.blueprint == blueprint && e.os == os));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    #[test]
    fn missing_status_file_loads_as_empty_document() {
        let home = tempdir().unwrap();
        let doc = StateDocument::load(home.path());
        assert!(doc.packages.is_empty());
        assert_eq!(doc.version, CURRENT_VERSION);
    }

    #[test]
    fn save_then_load_round_trips() {
        let home = tempdir().unwrap();
        let mut doc = StateDocument::new();
        doc.upsert_package(PackageEntry {
            name: "curl".into(),
            version: "latest".into(),
            blueprint: PathBuf::from("/abs/v1.bp"),
            os: "linux".into(),
            installed_at: now(),
        });
        doc.save(home.path()).unwrap();

        let reloaded = StateDocument::load(home.path());
        assert_eq!(reloaded.packages.len(), 1);
        assert_eq!(reloaded.packages[0].name, "curl");
    }

    #[test]
    fn upsert_replaces_entry_with_same_identity() {
        let mut doc = StateDocument::new();
        let blueprint = PathBuf::from("/abs/v1.bp");
        doc.upsert_package(PackageEntry {
            name: "curl".into(),
            version: "7".into(),
            blueprint: blueprint.clone(),
            os: "linux".into(),
            installed_at: now(),
        });
        doc.upsert_package(PackageEntry {
            name: "curl".into(),
            version: "8".into(),
            blueprint,
            os: "linux".into(),
            installed_at: now(),
        });
        assert_eq!(doc.packages.len(), 1);
        assert_eq!(doc.packages[0].version, "8");
    }

    #[test]
    fn remove_package_drops_matching_identity_only() {
        let mut doc = StateDocument::new();
        let blueprint = PathBuf::from("/abs/v1.bp");
        doc.upsert_package(PackageEntry {
            name: "curl".into(),
            version: "latest".into(),
            blueprint: blueprint.clone(),
            os: "linux".into(),
            installed_at: now(),
        });
        doc.upsert_package(PackageEntry {
            name: "vim".into(),
            version: "latest".into(),
            blueprint: blueprint.clone(),
            os: "linux".into(),
            installed_at: now(),
        });
        doc.remove_package("curl", &blueprint, "linux");
        assert_eq!(doc.packages.len(), 1);
        assert_eq!(doc.packages[0].name, "vim");
    }

    #[test]
    fn corrupt_status_file_is_treated_as_no_state() {
        let home = tempdir().unwrap();
        paths::ensure_base_dir(home.path()).unwrap();
        let path = guarded_path(home.path(), STATUS_FILE).unwrap();
        std::fs::write(&path, b"not json").unwrap();
        let doc = StateDocument::load(home.path());
        assert!(doc.packages.is_empty());
    }
}
