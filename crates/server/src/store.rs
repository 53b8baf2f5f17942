//! In-memory store of merged results, one entry per successful upload.

use apptmerge_core::MergeReport;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared handle to merged results keyed by an opaque token.
///
/// Bounded: once `capacity` is reached the oldest result is dropped.
#[derive(Debug, Clone)]
pub struct ResultStore {
    inner: Arc<RwLock<IndexMap<Uuid, Arc<MergeReport>>>>,
    capacity: usize,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Self {
        ResultStore {
            inner: Arc::new(RwLock::new(IndexMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Publish a report and return its token.
    pub async fn insert(&self, report: MergeReport) -> Uuid {
        let token = Uuid::new_v4();
        let mut results = self.inner.write().await;
        results.insert(token, Arc::new(report));

        while results.len() > self.capacity {
            if let Some((evicted, _)) = results.shift_remove_index(0) {
                tracing::debug!(%evicted, "evicted oldest result");
            }
        }

        token
    }

    pub async fn get(&self, token: &Uuid) -> Option<Arc<MergeReport>> {
        self.inner.read().await.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stem: &str) -> MergeReport {
        MergeReport {
            source_stem: stem.to_string(),
            ..MergeReport::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = ResultStore::new(4);
        let token = store.insert(report("week1")).await;

        assert_eq!(store.get(&token).await.unwrap().source_stem, "week1");
        assert!(store.get(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_results_are_isolated_per_token() {
        let store = ResultStore::new(4);
        let first = store.insert(report("first")).await;
        let second = store.insert(report("second")).await;

        assert_ne!(first, second);
        assert_eq!(store.get(&first).await.unwrap().source_stem, "first");
        assert_eq!(store.get(&second).await.unwrap().source_stem, "second");
    }

    #[tokio::test]
    async fn test_oldest_evicted_at_capacity() {
        let store = ResultStore::new(2);
        let a = store.insert(report("a")).await;
        let b = store.insert(report("b")).await;
        let c = store.insert(report("c")).await;

        assert!(store.get(&a).await.is_none());
        assert!(store.get(&b).await.is_some());
        assert!(store.get(&c).await.is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_keeps_latest() {
        let store = ResultStore::new(0);
        let token = store.insert(report("only")).await;
        assert!(store.get(&token).await.is_some());
    }
}
