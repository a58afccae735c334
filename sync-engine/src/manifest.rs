//! Build manifest loading.
//!
//! Two JSON shapes are accepted: a structured asset-compiler manifest with an
//! `assets` table, or a flat mapping of original name to compiled name. In
//! both cases the compiled names are the paths to sync.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{Result, SyncError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    /// Asset-compiler manifest: `{"assets": {"app.js": "app-<hash>.js"}, ...}`
    Compiler { assets: BTreeMap<String, String> },
    /// Flat original-to-compiled mapping
    Flat(BTreeMap<String, String>),
}

/// Load the set of compiled asset paths from a manifest file.
pub fn load(path: &Path) -> Result<BTreeSet<String>> {
    let raw = std::fs::read(path)
        .map_err(|e| SyncError::Manifest(format!("{}: {}", path.display(), e)))?;

    let manifest: ManifestFile = serde_json::from_slice(&raw)
        .map_err(|e| SyncError::Manifest(format!("{}: {}", path.display(), e)))?;

    let entries = match manifest {
        ManifestFile::Compiler { assets } => assets,
        ManifestFile::Flat(entries) => entries,
    };

    Ok(entries.into_values().collect())
}
