use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fibber_core::error::CoreError;
use fibber_core::job::{JobIndex, SlotValue};
use fibber_core::ports::{Snapshot, StateStore};

/// A [`StateStore`] held in process memory.
#[derive(Default)]
pub struct MemoryStateStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a single raw entry.
    pub async fn get(&self, index: JobIndex) -> Option<String> {
        self.entries.read().await.get(&index.key()).cloned()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn set(&self, index: JobIndex, value: SlotValue) -> Result<(), CoreError> {
        self.entries
            .write()
            .await
            .insert(index.key(), value.to_string());
        Ok(())
    }

    async fn snapshot(&self) -> Result<Snapshot, CoreError> {
        Ok(self.entries.read().await.clone())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fibber_core::job::PLACEHOLDER_VALUE;

    use super::*;

    fn idx(n: i64) -> JobIndex {
        JobIndex::new(n).unwrap()
    }

    #[tokio::test]
    async fn result_overwrites_placeholder() {
        let store = MemoryStateStore::new();
        store.set(idx(6), SlotValue::Pending).await.unwrap();
        assert_eq!(store.get(idx(6)).await.as_deref(), Some(PLACEHOLDER_VALUE));

        store.set(idx(6), SlotValue::Ready(13)).await.unwrap();
        assert_eq!(store.get(idx(6)).await.as_deref(), Some("13"));
    }

    #[tokio::test]
    async fn late_placeholder_overwrites_result() {
        let store = MemoryStateStore::new();
        store.set(idx(2), SlotValue::Ready(2)).await.unwrap();
        store.set(idx(2), SlotValue::Pending).await.unwrap();

        assert_eq!(store.get(idx(2)).await.as_deref(), Some(PLACEHOLDER_VALUE));
    }

    #[tokio::test]
    async fn snapshot_contains_every_key() {
        let store = MemoryStateStore::new();
        store.set(idx(1), SlotValue::Ready(1)).await.unwrap();
        store.set(idx(4), SlotValue::Pending).await.unwrap();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["1"], "1");
        assert_eq!(snapshot["4"], PLACEHOLDER_VALUE);
    }
}
