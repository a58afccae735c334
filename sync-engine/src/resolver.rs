//! # File Set Resolver
//!
//! Enumerates the local candidate files for a sync run.
//!
//! ## Overview
//!
//! The preferred source is the build manifest when one is configured; an
//! unreadable or malformed manifest logs a warning and falls back to a
//! recursive directory scan rather than failing the sync. Ignore filters are
//! applied to the enumerated set, always-upload and explicit extra paths are
//! forced in afterwards, and every surviving entry is checked to be a regular
//! file under the asset root.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{NameFilter, SyncConfig};
use crate::error::Result;
use crate::manifest;

/// Resolves the set of local asset paths to consider for upload.
pub struct FileSetResolver {
    root: PathBuf,
    manifest_path: Option<PathBuf>,
    ignored: Vec<NameFilter>,
    always_upload: Vec<String>,
    additional_paths: Vec<String>,
}

impl FileSetResolver {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            root: config.asset_root.clone(),
            manifest_path: config.manifest_path.clone(),
            ignored: config.ignored.clone(),
            always_upload: config.always_upload.clone(),
            additional_paths: config.additional_paths.clone(),
        }
    }

    /// Resolve the local file set.
    ///
    /// Guarantees: no duplicates, and every entry corresponds to a regular
    /// file under the asset root at resolution time.
    pub fn resolve(&self) -> Result<BTreeSet<String>> {
        let mut files = match &self.manifest_path {
            Some(path) => match manifest::load(path) {
                Ok(assets) => {
                    debug!(count = assets.len(), "Resolved file set from manifest");
                    assets
                }
                Err(e) => {
                    warn!(
                        manifest = %path.display(),
                        error = %e,
                        "Manifest unreadable; falling back to directory scan"
                    );
                    self.scan()?
                }
            },
            None => self.scan()?,
        };

        for extra in &self.additional_paths {
            files.insert(extra.clone());
        }

        files.retain(|path| !self.ignored.iter().any(|filter| filter.matches(path)));

        // Forced inclusions are added after the ignore filters: always-upload
        // wins when a path appears in both lists.
        for forced in &self.always_upload {
            files.insert(forced.clone());
        }

        files.retain(|path| self.root.join(path).is_file());

        Ok(files)
    }

    fn scan(&self) -> Result<BTreeSet<String>> {
        let files = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| relative_path(&self.root, entry.path()))
            .collect::<BTreeSet<String>>();

        debug!(count = files.len(), root = %self.root.display(), "Scanned asset root");
        Ok(files)
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExistingRemoteFiles;
    use uuid::Uuid;

    fn scratch_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("resolver-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"content").unwrap();
    }

    fn config_for(root: &Path) -> crate::config::SyncConfigBuilder {
        SyncConfig::builder()
            .asset_root(root)
            .bucket("bucket")
            .existing_remote_files(ExistingRemoteFiles::Compare)
    }

    #[test]
    fn scan_finds_nested_files_without_duplicates() {
        let root = scratch_root();
        touch(&root, "app.css");
        touch(&root, "js/app.js");
        touch(&root, "images/logo.png");

        let config = config_for(&root).build().unwrap();
        let files = FileSetResolver::from_config(&config).resolve().unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.contains("js/app.js"));
        assert!(files.contains("images/logo.png"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn ignore_filters_drop_matches() {
        let root = scratch_root();
        touch(&root, "app.css");
        touch(&root, ".DS_Store");
        touch(&root, "js/app.js.map");

        let config = config_for(&root)
            .ignore(".DS_Store")
            .ignore_pattern(r"\.map$")
            .build()
            .unwrap();
        let files = FileSetResolver::from_config(&config).resolve().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files.contains("app.css"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn always_upload_survives_ignore_filters() {
        let root = scratch_root();
        touch(&root, "robots.txt");

        let config = config_for(&root)
            .ignore("robots.txt")
            .always_upload("robots.txt")
            .build()
            .unwrap();
        let files = FileSetResolver::from_config(&config).resolve().unwrap();

        assert!(files.contains("robots.txt"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn additional_paths_must_exist_on_disk() {
        let root = scratch_root();
        touch(&root, "app.css");
        touch(&root, "extra/banner.svg");

        let config = config_for(&root)
            .additional_path("extra/banner.svg")
            .additional_path("extra/missing.svg")
            .build()
            .unwrap();
        let files = FileSetResolver::from_config(&config).resolve().unwrap();

        assert!(files.contains("extra/banner.svg"));
        assert!(!files.contains("extra/missing.svg"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn manifest_is_preferred_over_scan() {
        let root = scratch_root();
        touch(&root, "app-abc.css");
        touch(&root, "stray.tmp");

        let manifest_path = root.join("manifest.json");
        std::fs::write(
            &manifest_path,
            r#"{"assets": {"app.css": "app-abc.css"}}"#,
        )
        .unwrap();

        let config = config_for(&root)
            .manifest_path(&manifest_path)
            .build()
            .unwrap();
        let files = FileSetResolver::from_config(&config).resolve().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files.contains("app-abc.css"));
        assert!(!files.contains("stray.tmp"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn unreadable_manifest_falls_back_to_scan() {
        let root = scratch_root();
        touch(&root, "app.css");

        let config = config_for(&root)
            .manifest_path(root.join("nonexistent-manifest.json"))
            .build()
            .unwrap();
        let files = FileSetResolver::from_config(&config).resolve().unwrap();

        assert!(files.contains("app.css"));

        let _ = std::fs::remove_dir_all(&root);
    }
}
