//! In-memory implementation of InvoiceStore for testing and development

use crate::core::error::{StorageError, StoreResult};
use crate::core::{
    InvoiceCandidate, InvoiceCollection, InvoicePatch, InvoiceRecord, InvoiceStore, seed_invoices,
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

const BACKEND: &str = "in_memory";

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// the write lock is held across validation, the uniqueness check and the
/// append, so concurrent creates cannot both claim one invoice number.
#[derive(Clone)]
pub struct InMemoryInvoiceStore {
    records: Arc<RwLock<InvoiceCollection>>,
    seed: Arc<Vec<InvoiceRecord>>,
}

impl InMemoryInvoiceStore {
    /// Create a store holding the default seed set
    pub fn new() -> Self {
        Self::with_seed(seed_invoices())
    }

    /// Create a store that starts from, and resets to, `seed`
    pub fn with_seed(seed: Vec<InvoiceRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(InvoiceCollection::from_records(seed.clone()))),
            seed: Arc::new(seed),
        }
    }

    /// Create a store with no records
    pub fn empty() -> Self {
        Self::with_seed(Vec::new())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InvoiceCollection>> {
        self.records.read().map_err(|_| {
            StorageError::LockPoisoned {
                backend: BACKEND.to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, InvoiceCollection>> {
        self.records.write().map_err(|_| {
            StorageError::LockPoisoned {
                backend: BACKEND.to_string(),
            }
            .into()
        })
    }
}

impl Default for InMemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn list_all(&self) -> StoreResult<Vec<InvoiceRecord>> {
        Ok(self.read()?.to_records())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<InvoiceRecord>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn create(&self, candidate: InvoiceCandidate) -> StoreResult<InvoiceRecord> {
        let record = self.write()?.insert(&candidate)?;
        tracing::debug!(invoice_id = %record.id, invoice_number = %record.invoice_number, "invoice created");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: InvoicePatch) -> StoreResult<InvoiceRecord> {
        self.write()?.update(id, &patch)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.write()?.remove(id);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        *self.write()? = InvoiceCollection::from_records(self.seed.as_ref().clone());
        Ok(())
    }
}
