//! Cache Entry Module
//!
//! Defines the on-disk metadata record stored next to each cached document.

use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::cache::KeyMode;

/// File name of the metadata record inside an entry directory.
pub const METADATA_FILE: &str = "metadata.json";

/// File name of the document body inside an entry directory.
pub const DOCUMENT_FILE: &str = "documentation.md";

// == Subject ==
/// Key material recorded with an entry, depending on how it was addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    /// Library-mode entry
    Library {
        library_id: String,
        /// Document length in characters
        doc_size: usize,
    },
    /// Query-mode entry
    Query { query: String, cache_key: String },
}

impl Subject {
    /// Builds the subject for a document about to be written under `key`.
    pub fn for_key(key: &CacheKey, body: &str) -> Self {
        match (key.mode(), key.digest()) {
            (KeyMode::Query, Some(digest)) => Subject::Query {
                query: key.input().to_string(),
                cache_key: digest.to_string(),
            },
            _ => Subject::Library {
                library_id: key.input().to_string(),
                doc_size: body.chars().count(),
            },
        }
    }
}

// == Entry Metadata ==
/// Metadata record persisted as `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Creation timestamp (Unix seconds)
    pub timestamp: i64,
    /// Expiration timestamp (Unix seconds)
    pub expiry: i64,
    /// Provenance of the cached document
    pub source: String,
    /// Original key material
    #[serde(flatten)]
    pub subject: Subject,
}

impl EntryMetadata {
    /// Age of the entry in hours at `now`.
    pub fn age_hours_at(&self, now: i64) -> f64 {
        (now as f64 - self.timestamp as f64) / 3600.0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::resolve_key;

    #[test]
    fn test_library_metadata_json_shape() {
        let meta = EntryMetadata {
            timestamp: 100,
            expiry: 200,
            source: "Context7".to_string(),
            subject: Subject::Library {
                library_id: "/tiangolo/fastapi".to_string(),
                doc_size: 42,
            },
        };

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["timestamp"], 100);
        assert_eq!(value["expiry"], 200);
        assert_eq!(value["source"], "Context7");
        assert_eq!(value["library_id"], "/tiangolo/fastapi");
        assert_eq!(value["doc_size"], 42);
        assert!(value.get("query").is_none());
    }

    #[test]
    fn test_query_metadata_parses() {
        let json = r#"{
            "timestamp": 1700000000,
            "expiry": 1700604800,
            "source": "WebSearch",
            "query": "react hooks",
            "cache_key": "0123456789abcdef"
        }"#;

        let meta: EntryMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.source, "WebSearch");
        assert_eq!(
            meta.subject,
            Subject::Query {
                query: "react hooks".to_string(),
                cache_key: "0123456789abcdef".to_string(),
            }
        );
    }

    #[test]
    fn test_metadata_missing_expiry_is_rejected() {
        let json = r#"{"timestamp": 1, "source": "x", "library_id": "a", "doc_size": 1}"#;
        assert!(serde_json::from_str::<EntryMetadata>(json).is_err());
    }

    #[test]
    fn test_subject_for_key() {
        let key = resolve_key(KeyMode::Library, "/x/y").unwrap();
        assert_eq!(
            Subject::for_key(&key, "héllo"),
            Subject::Library {
                library_id: "/x/y".to_string(),
                doc_size: 5,
            }
        );

        let key = resolve_key(KeyMode::Query, "some query").unwrap();
        match Subject::for_key(&key, "body") {
            Subject::Query { query, cache_key } => {
                assert_eq!(query, "some query");
                assert_eq!(cache_key.len(), 16);
            }
            other => panic!("unexpected subject: {:?}", other),
        }
    }

    #[test]
    fn test_age_hours() {
        let meta = EntryMetadata {
            timestamp: 0,
            expiry: 7200,
            source: "s".to_string(),
            subject: Subject::Library {
                library_id: "a".to_string(),
                doc_size: 0,
            },
        };
        assert!((meta.age_hours_at(5400) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_age_hours_extreme_timestamps() {
        let meta = EntryMetadata {
            timestamp: i64::MIN,
            expiry: i64::MAX,
            source: "s".to_string(),
            subject: Subject::Library {
                library_id: "a".to_string(),
                doc_size: 0,
            },
        };
        let age = meta.age_hours_at(i64::MAX);
        assert!(age.is_finite() && age > 0.0);
    }
}
