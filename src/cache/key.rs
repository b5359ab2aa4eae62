//! Cache Key Module
//!
//! Maps library identifiers and free-text queries to filesystem-safe
//! locations under the cache root.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};

/// Number of hex characters kept from the query digest.
pub const QUERY_KEY_LEN: usize = 16;

/// Maximum length of the human-readable query slug, in characters.
pub const QUERY_SLUG_LEN: usize = 50;

/// Namespace directory for library-mode entries.
pub const LIBRARY_NAMESPACE: &str = "library";

/// Namespace directory for query-mode entries.
pub const QUERY_NAMESPACE: &str = "query";

// == Key Mode ==
/// Addressing scheme used to derive a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Stable library identifier such as `/tiangolo/fastapi`
    #[default]
    Library,
    /// Ad-hoc free-text query, addressed by digest
    Query,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Library => f.write_str("library"),
            KeyMode::Query => f.write_str("query"),
        }
    }
}

// == Cache Key ==
/// A resolved cache key: the caller's input plus the relative entry path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    mode: KeyMode,
    input: String,
    relative: PathBuf,
    digest: Option<String>,
}

impl CacheKey {
    /// Addressing mode this key was resolved with.
    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Original identifier or query text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Entry directory relative to the cache root.
    pub fn relative_path(&self) -> &PathBuf {
        &self.relative
    }

    /// Truncated query digest, present only in query mode.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}

// == Resolve ==
/// Resolves `input` to a cache key under the given addressing mode.
///
/// Library keys live at `library/<sanitized>`; query keys at
/// `query/<slug>/<digest>`. Blank input is rejected.
pub fn resolve_key(mode: KeyMode, input: &str) -> Result<CacheKey> {
    if input.trim().is_empty() {
        return Err(CacheError::InvalidKey(format!(
            "{} key cannot be empty",
            mode
        )));
    }

    let key = match mode {
        KeyMode::Library => {
            let segment = sanitize(input);
            if segment.is_empty() {
                return Err(CacheError::InvalidKey(format!(
                    "'{}' has no usable characters",
                    input
                )));
            }
            CacheKey {
                mode,
                input: input.to_string(),
                relative: PathBuf::from(LIBRARY_NAMESPACE).join(segment),
                digest: None,
            }
        }
        KeyMode::Query => {
            let digest = query_key(input);
            CacheKey {
                mode,
                input: input.to_string(),
                relative: PathBuf::from(QUERY_NAMESPACE)
                    .join(query_slug(input))
                    .join(&digest),
                digest: Some(digest),
            }
        }
    };

    Ok(key)
}

// == Sanitize ==
/// Converts a library identifier into a single safe path segment.
///
/// A single leading `/` is dropped, every other `/` and every character
/// outside `[A-Za-z0-9_.-]` becomes `_`. Segments made only of dots are
/// rewritten to underscores so they cannot address a parent directory.
///
/// The mapping is not injective: `/a/b` and `a_b` share a segment, and so do
/// `..` and `__`.
pub fn sanitize(identifier: &str) -> String {
    let trimmed = identifier.strip_prefix('/').unwrap_or(identifier);

    let segment: String = trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !segment.is_empty() && segment.chars().all(|c| c == '.') {
        return "_".repeat(segment.len());
    }

    segment
}

// == Query Key ==
/// Returns the first [`QUERY_KEY_LEN`] hex chars of the SHA-256 digest of `query`.
pub fn query_key(query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(QUERY_KEY_LEN);
    hex
}

/// Readable directory name for a query; not relied on for uniqueness.
pub fn query_slug(query: &str) -> String {
    let slug: String = query
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .take(QUERY_SLUG_LEN)
        .collect();

    if slug.is_empty() {
        "_".to_string()
    } else {
        slug
    }
}
