//! Blocking Store Access
//!
//! The store reads and writes the filesystem synchronously, so async callers
//! run it on tokio's blocking pool instead of a runtime worker thread.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::DocCache;
use crate::error::{CacheError, Result};

/// Runs `f` against the store under the write lock on the blocking pool.
///
/// A panic inside `f` surfaces as [`CacheError::Internal`].
pub async fn with_cache<T, F>(cache: &Arc<RwLock<DocCache>>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut DocCache) -> T + Send + 'static,
{
    let cache = Arc::clone(cache);

    tokio::task::spawn_blocking(move || {
        let mut guard = cache.blocking_write();
        f(&mut guard)
    })
    .await
    .map_err(|err| CacheError::Internal(format!("cache task failed: {}", err)))
}
