//! Content store read interface.
//!
//! The answering pipeline only ever reads from a store. Writes belong to the
//! content-acquisition side (see `index` for the SQLite-backed store).

use crate::types::ContentRecord;
use std::sync::Arc;
use tutor_core::AppResult;

/// Read access to stored course content.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Return every stored record in store order.
    ///
    /// Failures are reported as `AppError::Store`.
    async fn list_all_content(&self) -> AppResult<Vec<Arc<ContentRecord>>>;
}

/// A fixed, in-memory content store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Arc<ContentRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    async fn list_all_content(&self) -> AppResult<Vec<Arc<ContentRecord>>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentKind;

    #[tokio::test]
    async fn test_memory_store_preserves_order() {
        let store = MemoryStore::new(vec![
            ContentRecord::new(Some("A"), "first", "https://example.com/a", ContentKind::Course),
            ContentRecord::new(Some("B"), "second", "https://example.com/b", ContentKind::Discourse),
        ]);

        let records = store.list_all_content().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://example.com/a");
        assert_eq!(records[1].url, "https://example.com/b");
    }

    #[tokio::test]
    async fn test_empty_memory_store() {
        let store = MemoryStore::default();
        assert!(store.is_empty());
        assert!(store.list_all_content().await.unwrap().is_empty());
    }
}
