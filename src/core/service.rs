//! Store contract for invoice records

use crate::core::error::StoreResult;
use crate::core::invoice::{InvoiceCandidate, InvoicePatch, InvoiceRecord, InvoiceStatus};
use async_trait::async_trait;

/// Service trait for managing invoice records
///
/// Implementations own the authoritative collection. The framework is
/// agnostic to where it lives (memory, a file, an embedded database) and
/// callers receive it as `Arc<dyn InvoiceStore>`.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// All records in insertion order
    async fn list_all(&self) -> StoreResult<Vec<InvoiceRecord>>;

    /// Get a record by id
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<InvoiceRecord>>;

    /// Validate a candidate and append it as a new pending record
    ///
    /// Fails with a validation error naming the missing fields, or with a
    /// duplicate error if the invoice number is already taken. The store is
    /// unchanged on failure.
    async fn create(&self, candidate: InvoiceCandidate) -> StoreResult<InvoiceRecord>;

    /// Merge a patch into an existing record
    ///
    /// Fails with not-found for an unknown id. No field validation is re-applied.
    async fn update(&self, id: &str, patch: InvoicePatch) -> StoreResult<InvoiceRecord>;

    /// Set the status of a record
    async fn update_status(&self, id: &str, status: InvoiceStatus) -> StoreResult<InvoiceRecord> {
        self.update(id, InvoicePatch::status(status)).await
    }

    /// Delete a record; deleting an unknown id is not an error
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Reset the store to its seed set
    async fn clear(&self) -> StoreResult<()>;
}
