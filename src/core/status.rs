//! Status toggling on behalf of a caller
//!
//! The store applies whatever status it is given; deciding the next status
//! is the caller's job and lives here.

use crate::core::error::{InvoiceError, StoreResult};
use crate::core::invoice::InvoiceRecord;
use crate::core::service::InvoiceStore;

/// Flip a record between approved and pending
///
/// Reads the current status, writes the toggled one and returns the updated
/// record. Not atomic: a concurrent writer between the read and the write
/// wins the race.
pub async fn toggle_status<S>(store: &S, id: &str) -> StoreResult<InvoiceRecord>
where
    S: InvoiceStore + ?Sized,
{
    let current = store
        .get_by_id(id)
        .await?
        .ok_or_else(|| InvoiceError::not_found(id))?;

    let next = current.status.toggled();
    tracing::debug!(invoice_id = %id, from = %current.status, to = %next, "toggling invoice status");

    store.update_status(id, next).await
}
