//! # Sync Configuration
//!
//! Holds every knob the engine consumes: bucket target, key prefix, gzip
//! mode, upload concurrency, ignore/always-upload filters, custom headers,
//! cache-asset patterns, the existing-remote-files mode, cache-list and CDN
//! settings, and storage-class/ACL flags.
//!
//! ## Overview
//!
//! Configuration is constructed through [`SyncConfigBuilder`], which enforces
//! fail-fast validation: filter and header patterns are compiled to [`Regex`]
//! at build time so a bad pattern is rejected when the configuration is
//! loaded, not when a filter is first applied mid-sync.
//!
//! ## Usage
//!
//! ```no_run
//! use sync_engine::config::{ExistingRemoteFiles, SyncConfig};
//!
//! let config = SyncConfig::builder()
//!     .asset_root("public/assets")
//!     .bucket("my-site-assets")
//!     .prefix("assets")
//!     .gzip(true)
//!     .concurrent_uploads(8)
//!     .ignore(".DS_Store")
//!     .ignore_pattern(r"\.map$")
//!     .existing_remote_files(ExistingRemoteFiles::Compare)
//!     .build()
//!     .expect("Failed to build config");
//! ```

use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Result, SyncError};

/// How existing remote objects are treated during a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingRemoteFiles {
    /// Diff local files against the remote index and remove stale objects.
    #[default]
    Compare,
    /// Treat the bucket as empty: upload everything, never compare or delete.
    Ignore,
    /// Upload what the diff selects but leave stale remote objects in place.
    Keep,
}

/// A file-name filter, decided at configuration-parse time.
#[derive(Debug, Clone)]
pub enum NameFilter {
    /// Exact basename match
    Exact(String),
    /// Regular-expression match against the full relative path
    Pattern(Regex),
}

impl NameFilter {
    /// Build an exact-basename filter.
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Compile a pattern filter, rejecting invalid regexes at load time.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| SyncError::InvalidFilter {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    /// Whether this filter matches the given relative path.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(name) => path.rsplit('/').next().unwrap_or(path) == name,
            Self::Pattern(regex) => regex.is_match(path),
        }
    }
}

/// An ordered pattern-keyed custom header rule.
///
/// Exact-path header overrides live in [`SyncConfig::custom_headers`] and take
/// precedence; rules are consulted in declaration order only when no exact
/// entry matches.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    pub pattern: Regex,
    pub headers: BTreeMap<String, String>,
}

/// Engine configuration.
///
/// Use [`SyncConfig::builder`] to construct instances.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Local directory holding the built assets
    pub asset_root: PathBuf,

    /// Target bucket or container name
    pub bucket: String,

    /// Key prefix applied when turning local paths into remote keys
    pub prefix: Option<String>,

    /// Optional build manifest listing the assets to sync
    pub manifest_path: Option<PathBuf>,

    /// Substitute pre-gzipped sibling files when they are smaller
    pub gzip: bool,

    /// Maximum concurrent uploads; `None` uploads sequentially
    pub concurrent_uploads: Option<usize>,

    /// Files excluded from upload and protected from deletion
    pub ignored: Vec<NameFilter>,

    /// Files uploaded on every run regardless of the diff
    pub always_upload: Vec<String>,

    /// Explicit extra paths added to the resolved file set
    pub additional_paths: Vec<String>,

    /// Exact-path custom header overrides
    pub custom_headers: BTreeMap<String, BTreeMap<String, String>>,

    /// Ordered pattern-keyed custom header rules
    pub header_rules: Vec<HeaderRule>,

    /// Extra basename patterns treated as content-hashed (cacheable forever)
    pub cache_asset_patterns: Vec<Regex>,

    /// Existing-remote-files mode
    pub existing_remote_files: ExistingRemoteFiles,

    /// Local path of the persisted remote file list
    pub cache_list_path: Option<PathBuf>,

    /// Remote key the file list cache is mirrored to
    pub remote_cache_key: Option<String>,

    /// CDN distribution to invalidate after upload
    pub cdn_distribution_id: Option<String>,

    /// Paths submitted for CDN invalidation
    pub invalidation_paths: Vec<String>,

    /// Use a reduced-redundancy storage class on AWS-compatible providers
    pub reduced_redundancy: bool,

    /// Explicit canned ACL; wins over `public_read` when both are set
    pub acl: Option<String>,

    /// Request public-read access on uploaded objects
    pub public_read: bool,
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Map a local relative path to its full remote object key.
    pub fn remote_key(&self, path: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix, path),
            None => path.to_string(),
        }
    }

    /// Map a remote object key back to a local relative path.
    ///
    /// Returns `None` for keys outside the configured prefix; such objects do
    /// not belong to this sync and are never touched.
    pub fn strip_key(&self, key: &str) -> Option<String> {
        match &self.prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .map(str::to_string),
            None => Some(key.to_string()),
        }
    }
}

/// Builder for constructing [`SyncConfig`] instances.
///
/// Patterns are kept as raw strings until [`build()`](Self::build), which
/// compiles them and reports the first invalid one with an actionable error.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    asset_root: Option<PathBuf>,
    bucket: Option<String>,
    prefix: Option<String>,
    manifest_path: Option<PathBuf>,
    gzip: bool,
    concurrent_uploads: Option<usize>,
    ignore_names: Vec<String>,
    ignore_patterns: Vec<String>,
    always_upload: Vec<String>,
    additional_paths: Vec<String>,
    custom_headers: BTreeMap<String, BTreeMap<String, String>>,
    header_rules: Vec<(String, BTreeMap<String, String>)>,
    cache_asset_patterns: Vec<String>,
    existing_remote_files: ExistingRemoteFiles,
    cache_list_path: Option<PathBuf>,
    remote_cache_key: Option<String>,
    cdn_distribution_id: Option<String>,
    invalidation_paths: Vec<String>,
    reduced_redundancy: bool,
    acl: Option<String>,
    public_read: bool,
}

impl SyncConfigBuilder {
    /// Sets the local asset root directory.
    pub fn asset_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.asset_root = Some(path.into());
        self
    }

    /// Sets the target bucket name.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Sets the remote key prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the build manifest path.
    pub fn manifest_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Enables or disables gzip substitution.
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Enables concurrent uploads with the given worker cap.
    pub fn concurrent_uploads(mut self, max_workers: usize) -> Self {
        self.concurrent_uploads = Some(max_workers);
        self
    }

    /// Adds an exact-basename ignore entry.
    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.ignore_names.push(name.into());
        self
    }

    /// Adds a pattern ignore entry (compiled at build time).
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    /// Adds a path uploaded on every run regardless of the diff.
    pub fn always_upload(mut self, path: impl Into<String>) -> Self {
        self.always_upload.push(path.into());
        self
    }

    /// Adds an explicit extra path to the resolved file set.
    pub fn additional_path(mut self, path: impl Into<String>) -> Self {
        self.additional_paths.push(path.into());
        self
    }

    /// Sets custom headers for an exact path.
    pub fn custom_headers(
        mut self,
        path: impl Into<String>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        self.custom_headers.insert(path.into(), headers);
        self
    }

    /// Appends a pattern-keyed custom header rule (compiled at build time).
    pub fn header_rule(
        mut self,
        pattern: impl Into<String>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        self.header_rules.push((pattern.into(), headers));
        self
    }

    /// Adds a basename pattern treated as content-hashed.
    pub fn cache_asset_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.cache_asset_patterns.push(pattern.into());
        self
    }

    /// Sets the existing-remote-files mode.
    pub fn existing_remote_files(mut self, mode: ExistingRemoteFiles) -> Self {
        self.existing_remote_files = mode;
        self
    }

    /// Sets the local file list cache path.
    pub fn cache_list_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cache_list_path = Some(path.into());
        self
    }

    /// Sets the remote key the file list cache is mirrored to.
    pub fn remote_cache_key(mut self, key: impl Into<String>) -> Self {
        self.remote_cache_key = Some(key.into());
        self
    }

    /// Sets the CDN distribution to invalidate after upload.
    pub fn cdn_distribution_id(mut self, id: impl Into<String>) -> Self {
        self.cdn_distribution_id = Some(id.into());
        self
    }

    /// Adds a path submitted for CDN invalidation.
    pub fn invalidation_path(mut self, path: impl Into<String>) -> Self {
        self.invalidation_paths.push(path.into());
        self
    }

    /// Enables or disables the reduced-redundancy storage class.
    pub fn reduced_redundancy(mut self, enabled: bool) -> Self {
        self.reduced_redundancy = enabled;
        self
    }

    /// Sets an explicit canned ACL.
    pub fn acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = Some(acl.into());
        self
    }

    /// Enables or disables public-read access on uploaded objects.
    pub fn public_read(mut self, enabled: bool) -> Self {
        self.public_read = enabled;
        self
    }

    /// Builds the final `SyncConfig`, compiling all patterns.
    pub fn build(self) -> Result<SyncConfig> {
        let asset_root = self.asset_root.ok_or_else(|| {
            SyncError::Config("Asset root is required. Use .asset_root() to set it.".to_string())
        })?;

        let bucket = self.bucket.ok_or_else(|| {
            SyncError::Config("Bucket is required. Use .bucket() to set it.".to_string())
        })?;

        if bucket.is_empty() {
            return Err(SyncError::Config("Bucket cannot be empty".to_string()));
        }

        if self.concurrent_uploads == Some(0) {
            return Err(SyncError::Config(
                "Concurrent uploads must be greater than 0; omit .concurrent_uploads() \
                 to upload sequentially"
                    .to_string(),
            ));
        }

        // An empty prefix would produce keys with a leading slash.
        let prefix = self
            .prefix
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());

        let mut ignored: Vec<NameFilter> =
            self.ignore_names.into_iter().map(NameFilter::exact).collect();
        for pattern in &self.ignore_patterns {
            ignored.push(NameFilter::pattern(pattern)?);
        }

        let mut header_rules = Vec::with_capacity(self.header_rules.len());
        for (pattern, headers) in self.header_rules {
            let pattern = Regex::new(&pattern).map_err(|e| SyncError::InvalidFilter {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            header_rules.push(HeaderRule { pattern, headers });
        }

        let mut cache_asset_patterns = Vec::with_capacity(self.cache_asset_patterns.len());
        for pattern in &self.cache_asset_patterns {
            cache_asset_patterns.push(Regex::new(pattern).map_err(|e| {
                SyncError::InvalidFilter {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                }
            })?);
        }

        Ok(SyncConfig {
            asset_root,
            bucket,
            prefix,
            manifest_path: self.manifest_path,
            gzip: self.gzip,
            concurrent_uploads: self.concurrent_uploads,
            ignored,
            always_upload: self.always_upload,
            additional_paths: self.additional_paths,
            custom_headers: self.custom_headers,
            header_rules,
            cache_asset_patterns,
            existing_remote_files: self.existing_remote_files,
            cache_list_path: self.cache_list_path,
            remote_cache_key: self.remote_cache_key,
            cdn_distribution_id: self.cdn_distribution_id,
            invalidation_paths: self.invalidation_paths,
            reduced_redundancy: self.reduced_redundancy,
            acl: self.acl,
            public_read: self.public_read,
        })
    }
}
