// # File State Store
//
// Snapshots persisted as one JSON document, rewritten on every mutation.
//
// Writes go to `<path>.tmp` and are renamed over the document, so a reader
// never sees a half-written file. The document being replaced is first
// copied to `<path>.backup`; a document that no longer parses is replaced
// by that copy on open.
//
// ```json
// {
//   "version": "1.0",
//   "records": {
//     "objectscale_namespace.ns1": {
//       "type_name": "NamespaceResourceModel",
//       "attributes": {
//         "name": { "state": "string", "value": "ns1" },
//         "link": { "state": "null" }
//       },
//       "last_updated": "2025-01-09T12:00:00Z"
//     }
//   }
// }
// ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, error, info, trace, warn};

use crate::Error;
use crate::traits::state_store::{StateRecord, StateStore};

const DOCUMENT_VERSION: &str = "1.0";

type Records = BTreeMap<String, StateRecord>;

#[derive(Serialize, Deserialize)]
struct StateDocument {
    version: String,
    records: Records,
}

/// Snapshot store backed by a JSON document on disk
///
/// Records are kept in address order so successive documents diff cleanly.
///
/// ```rust,no_run
/// use scalebridge_core::{FileStateStore, StateStore};
///
/// # async fn run() -> scalebridge_core::Result<()> {
/// let store = FileStateStore::new("/var/lib/scalebridge/state.json").await?;
/// for address in store.list().await? {
///     println!("{}", address);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    /// Always equal to the last document written or loaded
    records: RwLock<Records>,
}

impl FileStateStore {
    /// Open the document at `path`, creating parent directories
    ///
    /// A document that fails to parse is recovered from its backup. With no
    /// usable backup the store opens empty.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        let missing_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty() && !dir.exists());
        if let Some(dir) = missing_dir {
            fs::create_dir_all(dir).await.map_err(|e| {
                Error::config(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }

        let records = match read_document(&path).await {
            Ok(records) => records,
            Err(Error::Json(parse_error)) => recover(&path, &parse_error).await,
            Err(e) => return Err(e),
        };
        debug!(path = %path.display(), records = records.len(), "Opened state file");

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Location of the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the document with `records`
    async fn persist(&self, records: Records) -> Result<Records, Error> {
        let document = StateDocument {
            version: DOCUMENT_VERSION.to_string(),
            records,
        };
        let body = serde_json::to_vec_pretty(&document)?;

        let staging = sibling(&self.path, "tmp");
        fs::write(&staging, &body).await.map_err(|e| {
            Error::state_store(format!("cannot write {}: {}", staging.display(), e))
        })?;

        if self.path.exists() {
            if let Err(e) = fs::copy(&self.path, sibling(&self.path, "backup")).await {
                warn!(path = %self.path.display(), "Backup copy failed: {}", e);
            }
        }

        fs::rename(&staging, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "cannot move {} into place: {}",
                staging.display(),
                e
            ))
        })?;

        trace!(path = %self.path.display(), records = document.records.len(), "State persisted");
        Ok(document.records)
    }
}

/// `path` with its extension replaced
fn sibling(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Parse the document at `path`; no file means no records
///
/// Parse failures are returned as `Error::Json`, I/O failures as
/// `Error::StateStore`.
async fn read_document(path: &Path) -> Result<Records, Error> {
    let body = match fs::read(path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Records::new()),
        Err(e) => {
            return Err(Error::state_store(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )));
        }
    };

    let document: StateDocument = serde_json::from_slice(&body)?;
    if document.version != DOCUMENT_VERSION {
        warn!(
            path = %path.display(),
            found = %document.version,
            expected = DOCUMENT_VERSION,
            "Unexpected state file version, loading anyway"
        );
    }
    Ok(document.records)
}

/// Fall back to the backup of a corrupted document
async fn recover(path: &Path, cause: &serde_json::Error) -> Records {
    warn!(path = %path.display(), "State file is corrupted: {}", cause);

    let backup = sibling(path, "backup");
    match read_document(&backup).await {
        Ok(records) if backup.exists() => {
            info!(records = records.len(), "Recovered state from {}", backup.display());
            if let Err(e) = fs::copy(&backup, path).await {
                error!("Restoring {} failed: {}", path.display(), e);
            }
            records
        }
        Ok(_) => {
            warn!("No state backup, starting empty");
            Records::new()
        }
        Err(e) => {
            error!("State backup is unusable too ({}), starting empty", e);
            Records::new()
        }
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, address: &str) -> Result<Option<StateRecord>, Error> {
        Ok(self.records.read().await.get(address).cloned())
    }

    async fn put(&self, address: &str, record: &StateRecord) -> Result<(), Error> {
        record.ensure_persistable()?;

        // Memory changes only once the document is on disk
        let mut records = self.records.write().await;
        let mut next = records.clone();
        next.insert(address.to_string(), record.clone());
        *records = self.persist(next).await?;
        Ok(())
    }

    async fn delete(&self, address: &str) -> Result<(), Error> {
        let mut records = self.records.write().await;
        if !records.contains_key(address) {
            return Ok(());
        }
        let mut next = records.clone();
        next.remove(address);
        *records = self.persist(next).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        Ok(self.records.read().await.keys().cloned().collect())
    }

    /// Every mutation is written through, so nothing is ever pending
    async fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Attributes, Value};
    use tempfile::tempdir;

    fn record(vpool: &str) -> StateRecord {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), Value::from("ns1"));
        attributes.insert("default_data_services_vpool".to_string(), Value::from(vpool));
        attributes.insert("link".to_string(), Value::Null);
        StateRecord::new("NamespaceResourceModel", attributes)
    }

    #[tokio::test]
    async fn test_reopen_sees_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileStateStore::new(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let original = record("vpool-1");
        store.put("objectscale_namespace.ns1", &original).await.unwrap();
        assert!(path.exists());
        assert!(!sibling(&path, "tmp").exists());

        let reopened = FileStateStore::new(&path).await.unwrap();
        let loaded = reopened.get("objectscale_namespace.ns1").await.unwrap();
        assert_eq!(loaded, Some(original));
    }

    #[tokio::test]
    async fn test_corrupted_document_falls_back_to_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileStateStore::new(&path).await.unwrap();
        store.put("ns", &record("vpool-1")).await.unwrap();
        // The second write backs up the first document
        store.put("ns", &record("vpool-2")).await.unwrap();
        assert!(sibling(&path, "backup").exists());

        fs::write(&path, b"{ not json").await.unwrap();

        let recovered = FileStateStore::new(&path).await.unwrap();
        let loaded = recovered.get("ns").await.unwrap().unwrap();
        assert_eq!(
            loaded.attribute("default_data_services_vpool"),
            Some(&Value::from("vpool-1"))
        );
    }

    #[tokio::test]
    async fn test_corrupted_document_without_backup_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"garbage").await.unwrap();

        let store = FileStateStore::new(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = FileStateStore::new(&path).await.unwrap();
        store.put("a", &record("v")).await.unwrap();
        store.put("b", &record("v")).await.unwrap();
        store.delete("a").await.unwrap();
        store.delete("missing").await.unwrap();
        store.flush().await.unwrap();

        let reopened = FileStateStore::new(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_records_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileStateStore::new(&path).await.unwrap();
        store.put("a", &record("vpool-1")).await.unwrap();

        // A directory in the staging location makes every write fail
        fs::create_dir(sibling(&path, "tmp")).await.unwrap();

        assert!(store.put("a", &record("vpool-2")).await.is_err());
        assert!(store.put("b", &record("vpool-2")).await.is_err());
        assert!(store.delete("a").await.is_err());

        assert_eq!(store.list().await.unwrap(), vec!["a"]);
        let kept = store.get("a").await.unwrap().unwrap();
        assert_eq!(
            kept.attribute("default_data_services_vpool"),
            Some(&Value::from("vpool-1"))
        );
    }
}
