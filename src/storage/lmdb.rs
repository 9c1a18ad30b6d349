//! LMDB storage backend using heed (memory-mapped B-tree).
//!
//! LMDB is an embedded key-value store; no external server is required.
//! All operations are synchronous (memory-mapped I/O) and are wrapped in
//! `tokio::task::spawn_blocking` for async compatibility.
//!
//! # Layout
//!
//! One named database, `invoices`, holding a single entry: the configured
//! storage key mapped to the JSON-encoded record array.
//!
//! # Fault handling
//!
//! A missing entry is initialized with the seed set. An entry that cannot be
//! read or decoded yields the seed set but is left in place until the next
//! successful write.
//!
//! # Consistency
//!
//! Every mutation runs inside one LMDB write transaction (load, apply,
//! put, commit). LMDB admits a single writer per environment, so writes are
//! serialized even across clones of the store. A failed operation drops the
//! transaction, leaving the stored array untouched.
//!
//! # Feature flag
//!
//! Enable with `--features lmdb`. Requires the `heed` crate.

use super::codec::{DEFAULT_STORAGE_KEY, records_from_value};
use crate::core::error::{StorageError, StoreResult};
use crate::core::{
    InvoiceCandidate, InvoiceCollection, InvoicePatch, InvoiceRecord, InvoiceStore, seed_invoices,
};
use async_trait::async_trait;
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

const BACKEND: &str = "lmdb";

fn lmdb_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::io(BACKEND, e)
}

/// Encode the record array as JSON bytes for LMDB storage.
fn lmdb_encode(records: &InvoiceCollection) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(&records.to_records())
        .map_err(|e| StorageError::serialization(BACKEND, e).into())
}

/// Decode the stored array; `None` when absent or unreadable.
fn lmdb_decode(bytes: &[u8]) -> Option<Vec<InvoiceRecord>> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => records_from_value(BACKEND, value),
        Err(e) => {
            tracing::error!(error = %e, "stored invoices are not JSON, falling back to seed data");
            None
        }
    }
}

/// Records from an optional stored entry, and whether the entry is absent
///
/// An undecodable entry yields the seed but is not reported as absent, so
/// readers never write over it.
fn load_or_seed(stored: Option<&[u8]>, seed: &[InvoiceRecord]) -> (InvoiceCollection, bool) {
    let Some(bytes) = stored else {
        return (InvoiceCollection::from_records(seed.to_vec()), true);
    };
    match lmdb_decode(bytes) {
        Some(records) => (InvoiceCollection::from_records(records), false),
        None => (InvoiceCollection::from_records(seed.to_vec()), false),
    }
}

/// LMDB-backed implementation of `InvoiceStore`.
///
/// The `Env` is wrapped in an `Arc` for cheap cloning across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use invoice_desk::storage::LmdbInvoiceStore;
///
/// let store = LmdbInvoiceStore::open("/var/lib/invoice-desk")?;
/// let record = store.create(candidate).await?;
/// ```
pub struct LmdbInvoiceStore {
    env: Arc<Env>,
    db: Database<Str, Bytes>,
    key: Arc<str>,
    seed: Arc<Vec<InvoiceRecord>>,
}

impl LmdbInvoiceStore {
    /// Open (or create) an LMDB environment at `path` and initialise the
    /// `invoices` named database.
    ///
    /// The map size defaults to 64 MB. LMDB will not actually allocate that
    /// much; it is a virtual address space reservation.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(64 * 1024 * 1024)
                .max_dbs(4)
                .max_readers(126)
                .open(path.as_ref())?
        };

        let mut wtxn = env.write_txn()?;
        let db: Database<Str, Bytes> = env.create_database(&mut wtxn, Some("invoices"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            db,
            key: Arc::from(DEFAULT_STORAGE_KEY),
            seed: Arc::new(seed_invoices()),
        })
    }

    /// Use a different key for the record array
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Arc::from(key);
        self
    }

    /// Use a different seed set
    pub fn with_seed(mut self, seed: Vec<InvoiceRecord>) -> Self {
        self.seed = Arc::new(seed);
        self
    }

    /// Current records; read faults degrade to the seed set
    async fn snapshot(&self) -> StoreResult<InvoiceCollection> {
        let env = self.env.clone();
        let db = self.db;
        let key = self.key.clone();
        let seed = self.seed.clone();

        tokio::task::spawn_blocking(move || {
            let stored = env
                .read_txn()
                .and_then(|rtxn| Ok(db.get(&rtxn, &key)?.map(<[u8]>::to_vec)));

            let stored = match stored {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::error!(error = %e, "failed to read invoices from LMDB, falling back to seed data");
                    return Ok(InvoiceCollection::from_records(seed.to_vec()));
                }
            };

            let (records, absent) = load_or_seed(stored.as_deref(), &seed);
            if absent {
                let persisted = lmdb_encode(&records).and_then(|bytes| {
                    let mut wtxn = env.write_txn().map_err(lmdb_err)?;
                    db.put(&mut wtxn, &key, &bytes).map_err(lmdb_err)?;
                    wtxn.commit().map_err(lmdb_err)?;
                    Ok(())
                });
                if let Err(e) = persisted {
                    tracing::warn!(error = %e, "failed to initialize invoices in LMDB");
                }
            }
            Ok(records)
        })
        .await
        .map_err(lmdb_err)?
    }

    /// Apply `op` inside one write transaction, committing only on success
    async fn mutate<R, F>(&self, op: F) -> StoreResult<R>
    where
        F: FnOnce(&mut InvoiceCollection) -> StoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let env = self.env.clone();
        let db = self.db;
        let key = self.key.clone();
        let seed = self.seed.clone();

        tokio::task::spawn_blocking(move || {
            let mut wtxn = env.write_txn().map_err(lmdb_err)?;
            let stored = db
                .get(&wtxn, &key)
                .map_err(lmdb_err)?
                .map(<[u8]>::to_vec);

            let (mut records, _) = load_or_seed(stored.as_deref(), &seed);
            let result = op(&mut records)?;

            let bytes = lmdb_encode(&records)?;
            db.put(&mut wtxn, &key, &bytes).map_err(lmdb_err)?;
            wtxn.commit().map_err(lmdb_err)?;
            Ok(result)
        })
        .await
        .map_err(lmdb_err)?
    }
}

impl Clone for LmdbInvoiceStore {
    fn clone(&self) -> Self {
        Self {
            env: Arc::clone(&self.env),
            db: self.db,
            key: Arc::clone(&self.key),
            seed: Arc::clone(&self.seed),
        }
    }
}

#[async_trait]
impl InvoiceStore for LmdbInvoiceStore {
    async fn list_all(&self) -> StoreResult<Vec<InvoiceRecord>> {
        Ok(self.snapshot().await?.to_records())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<InvoiceRecord>> {
        Ok(self.snapshot().await?.get(id).cloned())
    }

    async fn create(&self, candidate: InvoiceCandidate) -> StoreResult<InvoiceRecord> {
        let record = self
            .mutate(move |records| records.insert(&candidate))
            .await?;
        tracing::debug!(invoice_id = %record.id, invoice_number = %record.invoice_number, "invoice created");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: InvoicePatch) -> StoreResult<InvoiceRecord> {
        let id = id.to_owned();
        self.mutate(move |records| records.update(&id, &patch)).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let id = id.to_owned();
        self.mutate(move |records| {
            records.remove(&id);
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
