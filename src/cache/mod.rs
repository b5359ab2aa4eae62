//! Cache Module
//!
//! Disk-backed documentation cache: key resolution, entry storage, TTL
//! expiry and windowed search over cached documents.

mod entry;
mod expiry;
mod key;
mod search;
mod stats;
mod store;


// Re-export public types
pub use entry::{EntryMetadata, Subject, DOCUMENT_FILE, METADATA_FILE};
pub use expiry::{now_secs, ExpiryPolicy};
pub use key::{
    query_key, query_slug, resolve_key, sanitize, CacheKey, KeyMode, QUERY_KEY_LEN, QUERY_SLUG_LEN,
};
pub use search::{join_excerpts, query_terms, search, search_with_context, SECTION_SEPARATOR};
pub use stats::CacheStats;
pub use store::{CachedDocument, DocCache, Lookup, QueryOutcome, WriteReceipt};
