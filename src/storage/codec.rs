//! Persisted layout shared by the keyed backends
//!
//! Both the JSON file and the LMDB backends keep the whole record set as one
//! JSON array under a single fixed key. There is no schema version.

use crate::core::InvoiceRecord;
use crate::core::error::{StorageError, StoreResult};
use serde_json::Value;

/// Key the record array is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "invoice-processor-invoices";

pub(crate) fn records_to_value(backend: &str, records: &[InvoiceRecord]) -> StoreResult<Value> {
    serde_json::to_value(records).map_err(|e| StorageError::serialization(backend, e).into())
}

/// Decode a stored array, or `None` (logged) if it does not hold records
pub(crate) fn records_from_value(backend: &str, value: Value) -> Option<Vec<InvoiceRecord>> {
    match serde_json::from_value(value) {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::error!(backend, error = %e, "stored invoices are unreadable, falling back to seed data");
            None
        }
    }
}
