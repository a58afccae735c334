//! # Transfer Policy
//!
//! Builds a [`TransferSpec`] for every file selected for upload.
//!
//! ## Overview
//!
//! Rules are applied in order:
//! 1. Content type from the file extension via the MIME table
//! 2. Far-future cache headers for content-hashed basenames (a hex suffix of
//!    at least 32 characters, or a configured pattern)
//! 3. Custom headers: exact-path overrides before pattern rules; custom
//!    values win per key over the computed defaults
//! 4. Gzip negotiation: substitute a strictly smaller pre-gzipped sibling,
//!    or serve a standalone `.gz` artifact as the encoded plain asset when
//!    gzip mode is off
//! 5. Provider extras: reduced-redundancy storage class, ACL/public-read
//!    (an explicit ACL wins over the public flag)
//!
//! The policy performs no I/O beyond stat'ing the sibling gzip file; the
//! resulting spec fully determines the upload call.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use store_traits::ObjectMetadata;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::Result;

/// Seconds in the far-future cache window.
pub const ONE_YEAR_SECS: u64 = 31_536_000;

/// Storage class requested on AWS-compatible providers when configured.
pub const REDUCED_REDUNDANCY: &str = "REDUCED_REDUNDANCY";

/// Per-file upload decision record, consumed exactly once by the uploader.
#[derive(Debug, Clone)]
pub struct TransferSpec {
    /// Full remote object key (prefix applied)
    pub key: String,

    /// Local file read as the object body (the original or its gzip sibling)
    pub body_path: PathBuf,

    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub storage_class: Option<String>,
    pub acl: Option<String>,
    pub public_read: bool,

    /// Custom header overrides; win per key over the fields above
    pub custom_headers: BTreeMap<String, String>,
}

impl TransferSpec {
    /// Collapse the spec into the metadata sent with the upload call.
    ///
    /// Custom header values replace the computed defaults for any key they
    /// set explicitly; unset keys retain the defaults.
    pub fn metadata(&self) -> ObjectMetadata {
        let mut metadata = ObjectMetadata {
            content_type: self.content_type.clone(),
            content_encoding: self.content_encoding.clone(),
            cache_control: self.cache_control.clone(),
            expires: self.expires.map(|t| t.to_rfc2822()),
            storage_class: self.storage_class.clone(),
            acl: self.acl.clone(),
            public_read: self.public_read,
            extra: BTreeMap::new(),
        };

        for (name, value) in &self.custom_headers {
            match name.to_ascii_lowercase().as_str() {
                "content-type" => metadata.content_type = Some(value.clone()),
                "content-encoding" => metadata.content_encoding = Some(value.clone()),
                "cache-control" => metadata.cache_control = Some(value.clone()),
                "expires" => metadata.expires = Some(value.clone()),
                _ => {
                    metadata.extra.insert(name.clone(), value.clone());
                }
            }
        }

        metadata
    }
}

/// Decides transfer, compression, and header policy per file.
pub struct TransferPolicy {
    config: Arc<SyncConfig>,
    hashed_name: Regex,
}

impl TransferPolicy {
    pub fn new(config: Arc<SyncConfig>) -> Self {
        Self {
            config,
            hashed_name: Regex::new(r"-[0-9a-fA-F]{32,}(?:\.|$)").expect("valid regex"),
        }
    }

    /// Plan the transfer for one path.
    ///
    /// Returns `None` when gzip mode is enabled and the path itself is a
    /// `.gz` artifact: the non-gz sibling's plan substitutes this body, so
    /// uploading it separately would double-handle the file.
    pub fn plan_transfer(&self, path: &str) -> Result<Option<TransferSpec>> {
        let local = self.config.asset_root.join(path);

        if self.config.gzip && path.ends_with(".gz") {
            debug!(path, "Skipping gzip artifact; the sibling upload substitutes it");
            return Ok(None);
        }

        let mut body_path = local.clone();
        let mut content_encoding = None;
        let mut type_name = path;

        if self.config.gzip {
            let gz = self.config.asset_root.join(format!("{}.gz", path));
            if gz.is_file() {
                let original_len = std::fs::metadata(&local)?.len();
                let gzipped_len = std::fs::metadata(&gz)?.len();
                if gzipped_len < original_len {
                    debug!(
                        path,
                        original = original_len,
                        gzipped = gzipped_len,
                        "Substituting gzipped body"
                    );
                    body_path = gz;
                    content_encoding = Some("gzip".to_string());
                } else {
                    warn!(
                        path,
                        original = original_len,
                        gzipped = gzipped_len,
                        "Gzipped variant is not smaller; uploading the original"
                    );
                }
            }
        } else if let Some(plain) = path.strip_suffix(".gz") {
            // No substitution pass will touch this file: serve it as the
            // gzip-encoded version of the plain asset.
            type_name = plain;
            content_encoding = Some("gzip".to_string());
        }

        let content_type = content_type_for(type_name).map(str::to_string);

        let (cache_control, expires) = if self.cacheable(path) {
            (
                Some(format!("public, max-age={}", ONE_YEAR_SECS)),
                Some(Utc::now() + Duration::seconds(ONE_YEAR_SECS as i64)),
            )
        } else {
            (None, None)
        };

        let custom_headers = self.custom_headers_for(path);

        let acl = self.config.acl.clone();
        let public_read = self.config.public_read && acl.is_none();
        let storage_class = self
            .config
            .reduced_redundancy
            .then(|| REDUCED_REDUNDANCY.to_string());

        Ok(Some(TransferSpec {
            key: self.config.remote_key(path),
            body_path,
            content_type,
            content_encoding,
            cache_control,
            expires,
            storage_class,
            acl,
            public_read,
            custom_headers,
        }))
    }

    /// Whether the basename (post `.gz` strip) looks content-hashed.
    fn cacheable(&self, path: &str) -> bool {
        let basename = path.rsplit('/').next().unwrap_or(path);
        let basename = basename.strip_suffix(".gz").unwrap_or(basename);

        self.hashed_name.is_match(basename)
            || self
                .config
                .cache_asset_patterns
                .iter()
                .any(|pattern| pattern.is_match(basename))
    }

    /// Exact-path overrides take precedence over pattern rules; pattern
    /// rules are consulted in declaration order.
    fn custom_headers_for(&self, path: &str) -> BTreeMap<String, String> {
        if let Some(headers) = self.config.custom_headers.get(path) {
            return headers.clone();
        }
        for rule in &self.config.header_rules {
            if rule.pattern.is_match(path) {
                return rule.headers.clone();
            }
        }
        BTreeMap::new()
    }
}

/// MIME lookup by file extension; extend by adding entries to the match.
pub fn content_type_for(path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(path)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    let media_type = match extension.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        _ => return None,
    };

    Some(media_type)
}
