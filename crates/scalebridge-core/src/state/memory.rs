// # Memory State Store
//
// Snapshots that live only as long as the store. Used by tests, by one-shot
// CLI conversions, and by plugin processes whose state the framework owns.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::{StateRecord, StateStore};

/// Snapshot store held in process memory
///
/// Clones share one record map.
///
/// ```rust,no_run
/// use scalebridge_core::{Attributes, MemoryStateStore, StateRecord, StateStore};
///
/// # async fn run() -> scalebridge_core::Result<()> {
/// let store = MemoryStateStore::new();
/// let record = StateRecord::new("NamespaceResourceModel", Attributes::new());
/// store.put("objectscale_namespace.ns1", &record).await?;
/// assert!(store.get("objectscale_namespace.ns1").await?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    records: Arc<RwLock<BTreeMap<String, StateRecord>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Drop every record
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, address: &str) -> Result<Option<StateRecord>, Error> {
        Ok(self.records.read().await.get(address).cloned())
    }

    async fn put(&self, address: &str, record: &StateRecord) -> Result<(), Error> {
        record.ensure_persistable()?;
        self.records
            .write()
            .await
            .insert(address.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, address: &str) -> Result<(), Error> {
        self.records.write().await.remove(address);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        Ok(self.records.read().await.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}
