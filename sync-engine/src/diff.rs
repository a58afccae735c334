//! # Diff Engine
//!
//! Computes the upload and deletion sets from the local file set and the
//! remote index.
//!
//! ## Overview
//!
//! - Upload set: `(local − ignored − remote) ∪ always_upload`, expanded with
//!   the non-fingerprinted canonical alias of every fingerprinted entry, then
//!   restricted to regular files on disk.
//! - Deletion set: `remote_live − local − ignored − always_upload`. Callers
//!   must pass a live listing here, never the cached index, so objects the
//!   cache does not know about yet are never deleted.
//!
//! Fingerprinted names follow `<dir>/<basename>-<hash>.<ext>` where the hash
//! segment is a content-derived hex string of at least 32 characters.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::NameFilter;

/// Diff computation over local and remote key sets.
pub struct DiffEngine {
    asset_root: PathBuf,
    fingerprint: Regex,
}

impl DiffEngine {
    pub fn new<P: Into<PathBuf>>(asset_root: P) -> Self {
        Self {
            asset_root: asset_root.into(),
            fingerprint: Regex::new(
                r"^(?P<dir>.*/)?(?P<base>[^/]+)-[0-9a-fA-F]{32,}(?P<ext>\.[\w.]+)$",
            )
            .expect("valid regex"),
        }
    }

    /// Strip the hash segment from a fingerprinted path.
    ///
    /// Returns `None` for paths that do not match the fingerprint pattern;
    /// those form singleton groups and have no alias.
    pub fn canonical_alias(&self, path: &str) -> Option<String> {
        self.fingerprint.captures(path).map(|caps| {
            format!(
                "{}{}{}",
                caps.name("dir").map(|m| m.as_str()).unwrap_or(""),
                &caps["base"],
                &caps["ext"]
            )
        })
    }

    /// Compute the set of paths to upload.
    ///
    /// Always-upload entries win over ignore entries: they are added after
    /// the ignore filters are applied. Entries that are not regular files on
    /// disk are silently dropped.
    pub fn compute_upload_set(
        &self,
        local: &BTreeSet<String>,
        remote: &BTreeSet<String>,
        ignored: &[NameFilter],
        always_upload: &[String],
    ) -> BTreeSet<String> {
        let mut upload: BTreeSet<String> = local
            .iter()
            .filter(|path| !matches_any(ignored, path))
            .filter(|path| !remote.contains(*path))
            .cloned()
            .collect();

        upload.extend(always_upload.iter().cloned());

        // A fingerprinted upload pulls in its unhashed "latest" alias so
        // non-cache-busted references stay current. Each name was already
        // evaluated independently against the remote set above.
        let aliases: Vec<String> = upload
            .iter()
            .filter_map(|path| self.canonical_alias(path))
            .filter(|alias| !upload.contains(alias))
            .collect();
        upload.extend(aliases);

        upload.retain(|path| self.asset_root.join(path).is_file());
        upload
    }

    /// Compute the set of stale remote paths to delete.
    pub fn compute_deletion_set(
        &self,
        remote_live: &BTreeSet<String>,
        local: &BTreeSet<String>,
        ignored: &[NameFilter],
        always_upload: &[String],
    ) -> BTreeSet<String> {
        remote_live
            .iter()
            .filter(|key| !local.contains(*key))
            .filter(|key| !matches_any(ignored, key))
            .filter(|key| !always_upload.contains(key))
            .cloned()
            .collect()
    }
}

fn matches_any(filters: &[NameFilter], path: &str) -> bool {
    filters.iter().any(|filter| filter.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use uuid::Uuid;

    const HASH: &str = "abcdef0123456789abcdef0123456789";

    fn scratch_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("diff-test-{}", Uuid::new_v4()));
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

    fn set(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn canonical_alias_strips_exactly_the_hash_segment() {
        let engine = DiffEngine::new("/tmp");
        let hashed = format!("css/app-{}.css", HASH);

        assert_eq!(engine.canonical_alias(&hashed).as_deref(), Some("css/app.css"));
        assert_eq!(engine.canonical_alias("css/app.css"), None);
    }

    #[test]
    fn canonical_alias_is_stable() {
        let engine = DiffEngine::new("/tmp");
        let hashed = format!("js/vendor-{}.js", HASH);

        let alias = engine.canonical_alias(&hashed).unwrap();
        // A canonical name has no hash segment left to strip.
        assert_eq!(engine.canonical_alias(&alias), None);
    }

    #[test]
    fn short_hex_suffix_is_not_a_fingerprint() {
        let engine = DiffEngine::new("/tmp");
        assert_eq!(engine.canonical_alias("app-abcdef01.css"), None);
    }

    #[test]
    fn fingerprinted_gz_artifact_keeps_double_extension() {
        let engine = DiffEngine::new("/tmp");
        let hashed = format!("css/app-{}.css.gz", HASH);
        assert_eq!(
            engine.canonical_alias(&hashed).as_deref(),
            Some("css/app.css.gz")
        );
    }

    #[test]
    fn upload_set_adds_canonical_alias_for_fingerprinted_files() {
        let root = scratch_root();
        let hashed = format!("app-{}.css", HASH);
        touch(&root, &hashed);
        touch(&root, "app.css");

        let engine = DiffEngine::new(&root);
        let upload = engine.compute_upload_set(
            &set(&[&hashed]),
            &BTreeSet::new(),
            &[],
            &[],
        );

        assert_eq!(upload, set(&[&hashed, "app.css"]));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn alias_missing_on_disk_is_silently_dropped() {
        let root = scratch_root();
        let hashed = format!("app-{}.css", HASH);
        touch(&root, &hashed);

        let engine = DiffEngine::new(&root);
        let upload = engine.compute_upload_set(
            &set(&[&hashed]),
            &BTreeSet::new(),
            &[],
            &[],
        );

        assert_eq!(upload, set(&[&hashed]));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn unchanged_files_are_not_reuploaded() {
        let root = scratch_root();
        touch(&root, "app.js");
        touch(&root, "new.js");

        let engine = DiffEngine::new(&root);
        let upload = engine.compute_upload_set(
            &set(&["app.js", "new.js"]),
            &set(&["app.js"]),
            &[],
            &[],
        );

        assert_eq!(upload, set(&["new.js"]));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn second_run_uploads_only_always_upload_entries() {
        let root = scratch_root();
        touch(&root, "app.js");
        touch(&root, "index.html");

        let engine = DiffEngine::new(&root);
        let local = set(&["app.js", "index.html"]);
        let always = vec!["index.html".to_string()];

        // Remote already holds everything local from the previous run.
        let upload = engine.compute_upload_set(&local, &local, &[], &always);

        assert_eq!(upload, set(&["index.html"]));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn always_upload_wins_over_ignore() {
        let root = scratch_root();
        touch(&root, "robots.txt");

        let engine = DiffEngine::new(&root);
        let ignored = vec![NameFilter::exact("robots.txt")];
        let always = vec!["robots.txt".to_string()];

        let upload =
            engine.compute_upload_set(&set(&["robots.txt"]), &BTreeSet::new(), &ignored, &always);
        assert_eq!(upload, set(&["robots.txt"]));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn deletion_set_is_stale_remote_minus_protections() {
        let engine = DiffEngine::new("/tmp");
        let remote_live = set(&["app.js", "old.js", "keep.txt", ".DS_Store"]);
        let local = set(&["app.js"]);
        let ignored = vec![NameFilter::exact(".DS_Store")];
        let always = vec!["keep.txt".to_string()];

        let stale = engine.compute_deletion_set(&remote_live, &local, &ignored, &always);
        assert_eq!(stale, set(&["old.js"]));
    }

    #[test]
    fn upload_and_deletion_sets_are_disjoint() {
        let root = scratch_root();
        touch(&root, "app.js");
        touch(&root, "new.css");

        let engine = DiffEngine::new(&root);
        let local = set(&["app.js", "new.css"]);
        let remote = set(&["app.js", "old.js"]);

        let upload = engine.compute_upload_set(&local, &remote, &[], &[]);
        let stale = engine.compute_deletion_set(&remote, &local, &[], &[]);

        assert!(upload.is_disjoint(&stale));
        assert_eq!(upload, set(&["new.css"]));
        assert_eq!(stale, set(&["old.js"]));

        let _ = std::fs::remove_dir_all(&root);
    }
}
