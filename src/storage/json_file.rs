//! JSON file storage backend
//!
//! The file holds one JSON object; the record array lives under a single
//! fixed key (see [`DEFAULT_STORAGE_KEY`]) and any other keys in the document
//! are preserved on write.
//!
//! # Fault handling
//!
//! - Missing file or missing key: the seed set is written and returned.
//! - Unreadable or corrupt content: the seed set is returned and the fault is
//!   logged. Reads leave the file untouched; the next successful write
//!   replaces the corrupt content.
//! - Write failures are returned as [`StorageError`].
//!
//! Writes go to a sibling temp file which is then renamed over the target.

use super::codec::{DEFAULT_STORAGE_KEY, records_from_value, records_to_value};
use crate::core::error::{StorageError, StoreResult};
use crate::core::{
    InvoiceCandidate, InvoiceCollection, InvoicePatch, InvoiceRecord, InvoiceStore, seed_invoices,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

const BACKEND: &str = "json_file";

/// File-backed invoice store
///
/// Every operation holds an async mutex across load → mutate → save, so
/// operations through one store (and its clones) never interleave. Separate
/// processes writing the same file are not coordinated.
#[derive(Clone)]
pub struct JsonFileInvoiceStore {
    path: PathBuf,
    key: String,
    seed: Arc<Vec<InvoiceRecord>>,
    lock: Arc<Mutex<()>>,
}

/// Document loaded from disk plus the records under our key
struct Loaded {
    document: Map<String, Value>,
    records: InvoiceCollection,
    /// The file or key was absent and reads should persist the seed
    uninitialized: bool,
}

impl JsonFileInvoiceStore {
    /// Store backed by `path`, using the default key and seed set
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_STORAGE_KEY.to_string(),
            seed: Arc::new(seed_invoices()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Use a different document key for the record array
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Use a different seed set
    pub fn with_seed(mut self, seed: Vec<InvoiceRecord>) -> Self {
        self.seed = Arc::new(seed);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn seeded(&self, document: Map<String, Value>, uninitialized: bool) -> Loaded {
        Loaded {
            document,
            records: InvoiceCollection::from_records(self.seed.as_ref().clone()),
            uninitialized,
        }
    }

    async fn load(&self) -> Loaded {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return self.seeded(Map::new(), true),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to read invoice file, falling back to seed data");
                return self.seeded(Map::new(), false);
            }
        };

        let mut document = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(document)) => document,
            Ok(_) | Err(_) => {
                tracing::error!(path = %self.path.display(), "invoice file is not a JSON object, falling back to seed data");
                return self.seeded(Map::new(), false);
            }
        };

        match document.remove(&self.key) {
            None => self.seeded(document, true),
            Some(value) => match records_from_value(BACKEND, value) {
                Some(records) => Loaded {
                    document,
                    records: InvoiceCollection::from_records(records),
                    uninitialized: false,
                },
                None => self.seeded(document, false),
            },
        }
    }

    async fn save(&self, document: &Map<String, Value>, records: &InvoiceCollection) -> StoreResult<()> {
        let mut document = document.clone();
        document.insert(
            self.key.clone(),
            records_to_value(BACKEND, &records.to_records())?,
        );
        let bytes = serde_json::to_vec_pretty(&Value::Object(document))
            .map_err(|e| StorageError::serialization(BACKEND, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(BACKEND, e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StorageError::io(BACKEND, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(BACKEND, e))?;

        Ok(())
    }

    /// Load for reading
    ///
    /// A missing file or key is initialized with the seed on a best-effort
    /// basis. Corrupt or unreadable content is never written over here.
    async fn snapshot(&self) -> InvoiceCollection {
        let _guard = self.lock.lock().await;
        let loaded = self.load().await;
        if loaded.uninitialized {
            if let Err(e) = self.save(&loaded.document, &loaded.records).await {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to initialize invoice file");
            }
        }
        loaded.records
    }

    /// Load, apply `op`, and save if `op` succeeded
    async fn mutate<R>(
        &self,
        op: impl FnOnce(&mut InvoiceCollection) -> StoreResult<R> + Send,
    ) -> StoreResult<R>
    where
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let Loaded {
            document,
            mut records,
            ..
        } = self.load().await;

        let result = op(&mut records)?;
        self.save(&document, &records).await?;

        Ok(result)
    }
}

#[async_trait]
impl InvoiceStore for JsonFileInvoiceStore {
    async fn list_all(&self) -> StoreResult<Vec<InvoiceRecord>> {
        Ok(self.snapshot().await.to_records())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<InvoiceRecord>> {
        Ok(self.snapshot().await.get(id).cloned())
    }

    async fn create(&self, candidate: InvoiceCandidate) -> StoreResult<InvoiceRecord> {
        let record = self.mutate(|records| records.insert(&candidate)).await?;
        tracing::debug!(invoice_id = %record.id, invoice_number = %record.invoice_number, "invoice created");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: InvoicePatch) -> StoreResult<InvoiceRecord> {
        self.mutate(|records| records.update(id, &patch)).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.mutate(|records| {
            records.remove(id);
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> StoreResult<()> {
        let seed = self.seed.as_ref().clone();
        self.mutate(move |records| {
            *records = InvoiceCollection::from_records(seed);
            Ok(())
        })
        .await
    }
}
