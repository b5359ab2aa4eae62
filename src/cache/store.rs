//! Cache Store Module
//!
//! Disk-backed entry store: one directory per key holding a metadata record
//! and the document body, gated by the expiry policy on every read.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cache::expiry::now_secs;
use crate::cache::search::search_with_context;
use crate::cache::{
    CacheKey, CacheStats, EntryMetadata, ExpiryPolicy, Subject, DOCUMENT_FILE, METADATA_FILE,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cached Document ==
/// A valid entry read back from disk.
#[derive(Debug, Clone)]
pub struct CachedDocument {
    /// Entry directory
    pub path: PathBuf,
    /// Parsed metadata record
    pub metadata: EntryMetadata,
    /// Document body, exactly as written
    pub body: String,
    /// Age at lookup time, in hours
    pub age_hours: f64,
}

impl CachedDocument {
    /// Provenance label recorded at write time.
    pub fn source(&self) -> &str {
        &self.metadata.source
    }
}

// == Lookup ==
/// Outcome of a validity check. Never an error: every failure is reported
/// as one of these variants.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Entry present, readable and within its TTL
    Hit(CachedDocument),
    /// Entry directory or one of its files is missing
    Miss { path: PathBuf },
    /// Entry was past its TTL and has been removed
    Expired { path: PathBuf },
    /// Entry present but metadata or body could not be read; left in place
    Corrupt { path: PathBuf, reason: String },
}

impl Lookup {
    /// Short status tag: `HIT`, `MISS`, `EXPIRED` or `ERROR`.
    pub fn status(&self) -> &'static str {
        match self {
            Lookup::Hit(_) => "HIT",
            Lookup::Miss { .. } => "MISS",
            Lookup::Expired { .. } => "EXPIRED",
            Lookup::Corrupt { .. } => "ERROR",
        }
    }

    /// Entry directory the lookup examined.
    pub fn path(&self) -> &Path {
        match self {
            Lookup::Hit(doc) => &doc.path,
            Lookup::Miss { path } | Lookup::Expired { path } | Lookup::Corrupt { path, .. } => {
                path
            }
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    /// Consumes the lookup, returning the document on a hit.
    pub fn into_document(self) -> Option<CachedDocument> {
        match self {
            Lookup::Hit(doc) => Some(doc),
            _ => None,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Hit(doc) => write!(
                f,
                "HIT: Found cache ({:.1}h old) at {}",
                doc.age_hours,
                doc.path.display()
            ),
            Lookup::Miss { path } => write!(f, "MISS: No cache found at {}", path.display()),
            Lookup::Expired { path } => {
                write!(f, "EXPIRED: Cache expired at {}", path.display())
            }
            Lookup::Corrupt { path, reason } => {
                write!(f, "ERROR: Invalid cache at {}: {}", path.display(), reason)
            }
        }
    }
}

// == Query Outcome ==
/// Result of searching inside a cached document.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// At least one line matched; excerpts are deduplicated and in order
    Found {
        document: CachedDocument,
        excerpts: Vec<String>,
    },
    /// Document is cached but nothing matched
    NoMatch { document: CachedDocument },
    /// No valid document to search
    NotCached(Lookup),
}

impl QueryOutcome {
    /// The underlying lookup status line.
    pub fn lookup_status_line(&self) -> String {
        match self {
            QueryOutcome::Found { document, .. } | QueryOutcome::NoMatch { document } => {
                Lookup::Hit(document.clone()).to_string()
            }
            QueryOutcome::NotCached(lookup) => lookup.to_string(),
        }
    }

    /// `QUERY HIT`/`QUERY MISS` line, or `None` when nothing was cached.
    pub fn status_line(&self, key: &CacheKey, terms: &str) -> Option<String> {
        match self {
            QueryOutcome::Found { excerpts, .. } => Some(format!(
                "QUERY HIT: Found {} relevant sections in {}",
                excerpts.len(),
                key
            )),
            QueryOutcome::NoMatch { .. } => Some(format!(
                "QUERY MISS: No relevant content found for '{}' in {}",
                terms, key
            )),
            QueryOutcome::NotCached(_) => None,
        }
    }
}

// == Write Receipt ==
/// Confirmation of a completed write.
#[derive(Debug, Clone)]
pub struct WriteReceipt {
    /// Entry directory
    pub path: PathBuf,
    /// Metadata record as written
    pub metadata: EntryMetadata,
    /// Body length in characters
    pub chars: usize,
    /// Body length in bytes
    pub bytes: usize,
}

impl fmt::Display for WriteReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CACHED: {} chars ({} bytes) at {}",
            self.chars,
            self.bytes,
            self.path.display()
        )
    }
}

// == Doc Cache ==
/// Disk-backed documentation cache rooted at a configured directory.
#[derive(Debug)]
pub struct DocCache {
    /// Directory holding every entry
    root: PathBuf,
    /// TTL applied at write time
    policy: ExpiryPolicy,
    /// Outcome counters for this instance
    stats: CacheStats,
}

impl DocCache {
    // == Constructor ==
    /// Creates a cache rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            root: root.into(),
            policy: ExpiryPolicy::new(ttl_secs),
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_root.clone(), config.ttl)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that holds the entry for `key`.
    pub fn entry_dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    // == Check ==
    /// Checks `key` against the wall clock.
    pub fn check(&mut self, key: &CacheKey) -> Lookup {
        self.check_at(key, now_secs())
    }

    /// Checks whether a valid entry exists for `key` at time `now`.
    ///
    /// Expired entries are deleted before `Expired` is returned. Corrupt
    /// entries are reported and left on disk.
    pub fn check_at(&mut self, key: &CacheKey, now: i64) -> Lookup {
        let dir = self.entry_dir(key);
        let metadata_path = dir.join(METADATA_FILE);
        let document_path = dir.join(DOCUMENT_FILE);

        if !(metadata_path.is_file() && document_path.is_file()) {
            debug!(key = %key, path = %dir.display(), "cache miss");
            self.stats.record_miss();
            return Lookup::Miss { path: dir };
        }

        let metadata = match read_metadata(&metadata_path) {
            Ok(metadata) => metadata,
            Err(reason) => {
                warn!(key = %key, path = %dir.display(), %reason, "corrupt cache entry");
                self.stats.record_corrupt();
                return Lookup::Corrupt { path: dir, reason };
            }
        };

        if self.policy.is_expired(&metadata, now) {
            match self.evict(&dir) {
                Ok(()) => self.stats.record_evictions(1),
                Err(err) => warn!(path = %dir.display(), error = %err, "failed to evict expired entry"),
            }
            info!(key = %key, expiry = metadata.expiry, "cache entry expired");
            self.stats.record_expired();
            return Lookup::Expired { path: dir };
        }

        let body = match fs::read_to_string(&document_path) {
            Ok(body) => body,
            Err(err) => {
                let reason = format!("unreadable document: {}", err);
                warn!(key = %key, path = %dir.display(), %reason, "corrupt cache entry");
                self.stats.record_corrupt();
                return Lookup::Corrupt { path: dir, reason };
            }
        };

        debug!(key = %key, bytes = body.len(), "cache hit");
        self.stats.record_hit();
        Lookup::Hit(CachedDocument {
            path: dir,
            age_hours: metadata.age_hours_at(now),
            metadata,
            body,
        })
    }

    // == Write ==
    /// Writes `body` under `key` stamped with the wall clock.
    pub fn write(&mut self, key: &CacheKey, source: &str, body: &str) -> Result<WriteReceipt> {
        self.write_at(key, source, body, now_secs())
    }

    /// Writes `body` under `key` as if created at `now`.
    ///
    /// Any previous metadata is removed first and the new metadata is written
    /// last, so an interrupted write reads back as a miss rather than a hit.
    pub fn write_at(
        &mut self,
        key: &CacheKey,
        source: &str,
        body: &str,
        now: i64,
    ) -> Result<WriteReceipt> {
        if body.trim().is_empty() {
            return Err(CacheError::EmptyDocument);
        }

        let dir = self.entry_dir(key);
        fs::create_dir_all(&dir)?;

        let metadata_path = dir.join(METADATA_FILE);
        match fs::remove_file(&metadata_path) {
            Ok(()) => debug!(path = %dir.display(), "replacing existing entry"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        fs::write(dir.join(DOCUMENT_FILE), body)?;

        let metadata = EntryMetadata {
            timestamp: now,
            expiry: self.policy.expiry_for(now),
            source: source.to_string(),
            subject: Subject::for_key(key, body),
        };
        fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

        self.stats.record_write();
        info!(key = %key, mode = %key.mode(), bytes = body.len(), path = %dir.display(), "cached document");

        Ok(WriteReceipt {
            path: dir,
            metadata,
            chars: body.chars().count(),
            bytes: body.len(),
        })
    }

    // == Query ==
    /// Searches the cached document for `key` using the wall clock.
    pub fn query(&mut self, key: &CacheKey, terms: &str, context: usize) -> QueryOutcome {
        self.query_at(key, terms, context, now_secs())
    }

    /// Checks `key` at `now` and, on a hit, runs a windowed search over the body.
    pub fn query_at(&mut self, key: &CacheKey, terms: &str, context: usize, now: i64) -> QueryOutcome {
        let document = match self.check_at(key, now) {
            Lookup::Hit(document) => document,
            other => return QueryOutcome::NotCached(other),
        };

        let excerpts = search_with_context(&document.body, terms, context);
        debug!(key = %key, terms, sections = excerpts.len(), "searched cached document");

        if excerpts.is_empty() {
            QueryOutcome::NoMatch { document }
        } else {
            QueryOutcome::Found { document, excerpts }
        }
    }

    // == Sweep ==
    /// Removes every expired entry under the root using the wall clock.
    pub fn sweep_expired(&mut self) -> Result<usize> {
        self.sweep_expired_at(now_secs())
    }

    /// Removes every entry expired at `now`.
    ///
    /// Entries whose metadata cannot be parsed are left alone. Returns the
    /// number of entries removed.
    pub fn sweep_expired_at(&mut self, now: i64) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut expired = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable path during sweep");
                    continue;
                }
            };

            if !entry.file_type().is_file() || entry.file_name() != METADATA_FILE {
                continue;
            }
            let Some(dir) = entry.path().parent() else {
                continue;
            };

            match read_metadata(entry.path()) {
                Ok(metadata) if self.policy.is_expired(&metadata, now) => {
                    expired.push(dir.to_path_buf());
                }
                Ok(_) => {}
                Err(reason) => debug!(path = %dir.display(), %reason, "sweep skipped corrupt entry"),
            }
        }

        for dir in &expired {
            self.evict(dir)?;
        }

        let removed = expired.len();
        self.stats.record_evictions(removed as u64);
        Ok(removed)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Deletes an entry directory and any query slug directory it leaves empty.
    fn evict(&self, dir: &Path) -> io::Result<()> {
        fs::remove_dir_all(dir)?;

        let mut current = dir.parent();
        while let Some(parent) = current {
            if parent == self.root.as_path() || parent.parent() == Some(self.root.as_path()) {
                break;
            }
            if fs::remove_dir(parent).is_err() {
                break;
            }
            current = parent.parent();
        }
        Ok(())
    }
}

/// Reads and parses a metadata record, describing any failure.
fn read_metadata(path: &Path) -> std::result::Result<EntryMetadata, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unreadable metadata: {}", err))?;
    serde_json::from_str(&raw).map_err(|err| format!("unparseable metadata: {}", err))
}
