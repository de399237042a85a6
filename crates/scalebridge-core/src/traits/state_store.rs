// # State Store Trait
//
// Defines the interface for persisting tri-state snapshots of models.
//
// ## Purpose
//
// The plugin framework keeps the last observed state of every managed
// resource. A snapshot is the model's attribute map plus the model type it
// was captured from, keyed by a resource address such as
// `objectscale_namespace.ns1`.
//
// ## Implementations
//
// - In-memory: `MemoryStateStore`
// - File-based: `FileStateStore` (JSON, atomic writes, backup recovery)
//
// ## Usage
//
// ```rust,ignore
// use scalebridge_core::{BindingRegistry, StateRecord, StateStore};
//
// let record = StateRecord::capture(&model, &registry)?;
// store.put("objectscale_namespace.ns1", &record).await?;
//
// let restored: NamespaceResourceModel = store
//     .get("objectscale_namespace.ns1")
//     .await?
//     .expect("record exists")
//     .restore(&registry)?;
// ```

use async_trait::async_trait;

use crate::registry::BindingRegistry;
use crate::traits::Model;
use crate::value::{Attributes, Value};

/// Persisted snapshot of one model instance
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateRecord {
    /// Short type name of the model the snapshot was captured from
    pub type_name: String,
    /// Attribute values, keyed by binding key
    pub attributes: Attributes,
    /// Timestamp of the capture
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl StateRecord {
    /// Create a new state record stamped with the current time
    pub fn new(type_name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            type_name: type_name.into(),
            attributes,
            last_updated: chrono::Utc::now(),
        }
    }

    /// Capture a model through its bindings
    pub fn capture<M: Model>(model: &M, registry: &BindingRegistry) -> Result<Self, crate::Error> {
        let bindings = registry.model::<M>()?;
        let attributes = bindings.to_attributes(model, registry)?;
        Ok(Self::new(bindings.type_name(), attributes))
    }

    /// Rebuild the model this record was captured from
    pub fn restore<M: Model>(&self, registry: &BindingRegistry) -> Result<M, crate::Error> {
        let bindings = registry.model::<M>()?;
        if self.type_name != bindings.type_name() {
            return Err(crate::Error::state_store(format!(
                "record holds {}, cannot restore as {}",
                self.type_name,
                bindings.type_name()
            )));
        }
        bindings.from_attributes(self.attributes.clone(), registry)
    }

    /// Check if the record is stale (older than given duration)
    pub fn is_stale(&self, max_age: chrono::Duration) -> bool {
        let now = chrono::Utc::now();
        now.signed_duration_since(self.last_updated) > max_age
    }

    /// Reject records with no stored form: Unknown values anywhere, and
    /// NaN or infinite floats, which JSON writes as `null`
    pub fn ensure_persistable(&self) -> Result<(), crate::Error> {
        for (key, value) in &self.attributes {
            let reason = if value.contains_unknown() {
                "is unknown"
            } else if value.contains_non_finite() {
                "holds a non-finite float"
            } else {
                continue;
            };
            return Err(crate::Error::state_store(format!(
                "attribute '{}' of {} {} and cannot be persisted",
                key, self.type_name, reason
            )));
        }
        Ok(())
    }

    /// Look up one attribute
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Trait for state store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// `put` must reject records for which [`StateRecord::ensure_persistable`]
/// fails.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the record stored at `address`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StateRecord))`: The stored record
    /// - `Ok(None)`: No record found
    /// - `Err(Error)`: Storage error
    async fn get(&self, address: &str) -> Result<Option<StateRecord>, crate::Error>;

    /// Create or replace the record at `address`
    async fn put(&self, address: &str, record: &StateRecord) -> Result<(), crate::Error>;

    /// Delete the record at `address` (no error if it didn't exist)
    async fn delete(&self, address: &str) -> Result<(), crate::Error>;

    /// List all addresses in the store
    async fn list(&self) -> Result<Vec<String>, crate::Error>;

    /// Persist any pending changes
    ///
    /// Some implementations may buffer writes. This ensures
    /// all changes are flushed to persistent storage.
    async fn flush(&self) -> Result<(), crate::Error>;
}
