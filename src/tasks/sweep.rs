//! Expiry Sweep Task
//!
//! Background reaper that periodically removes expired cache entries. Lookups
//! still evict lazily; this task only catches entries nobody touches.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::DocCache;
use crate::tasks::with_cache;

/// Spawns a background task that sweeps expired entries every
/// `sweep_interval_secs` seconds.
///
/// The task sleeps before each pass and sweeps on the blocking pool under the
/// write lock. Sweep failures are logged and retried on the next
/// pass.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(DocCache::new("/tmp/doccache", 604_800)));
/// let sweep_handle = spawn_sweep_task(cache.clone(), 3600);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: Arc<RwLock<DocCache>>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let result = with_cache(&cache, |store| store.sweep_expired())
                .await
                .and_then(|swept| swept);

            match result {
                Ok(0) => debug!("Expiry sweep: no expired entries found"),
                Ok(removed) => info!("Expiry sweep: removed {} expired entries", removed),
                Err(err) => warn!("Expiry sweep failed: {}", err),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{now_secs, resolve_key, KeyMode};
    use tempfile::TempDir;

    const TTL: u64 = 3600;

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(RwLock::new(DocCache::new(dir.path(), TTL)));
        let key = resolve_key(KeyMode::Library, "/stale/lib").unwrap();

        // Written long enough ago to be past its TTL already
        let entry_dir = {
            let mut cache_guard = cache.write().await;
            cache_guard
                .write_at(&key, "src", "stale", now_secs() - TTL as i64 - 60)
                .unwrap();
            cache_guard.entry_dir(&key)
        };
        assert!(entry_dir.exists());

        let handle = spawn_sweep_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!entry_dir.exists(), "Expired entry should have been swept");
        assert_eq!(cache.read().await.stats().evictions, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(RwLock::new(DocCache::new(dir.path(), TTL)));
        let key = resolve_key(KeyMode::Library, "/fresh/lib").unwrap();

        {
            let mut cache_guard = cache.write().await;
            cache_guard.write(&key, "src", "fresh").unwrap();
        }

        let handle = spawn_sweep_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let mut cache_guard = cache.write().await;
            let doc = cache_guard.check(&key).into_document();
            assert_eq!(doc.map(|d| d.body), Some("fresh".to_string()));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(RwLock::new(DocCache::new(dir.path(), TTL)));

        let handle = spawn_sweep_task(cache, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
