//! Search parameters and the listing filter view

use crate::core::invoice::InvoiceRecord;
use serde::Deserialize;

/// Query parameters for the invoice listing
///
/// # Example
/// ```rust,ignore
/// GET /invoices
/// GET /invoices?q=premium
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SearchParams {
    /// Case-insensitive substring matched against invoice number and vendor
    pub q: Option<String>,
}

impl SearchParams {
    /// The search term, empty when absent
    pub fn term(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }
}

/// Whether a record matches a search term
///
/// The term is compared case-insensitively against `invoiceNumber` and
/// `vendor`. An empty term matches everything.
pub fn matches_term(record: &InvoiceRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record.invoice_number.to_lowercase().contains(&needle)
        || record.vendor.to_lowercase().contains(&needle)
}

/// Records matching `term`, in their original order
pub fn filter_records(records: &[InvoiceRecord], term: &str) -> Vec<InvoiceRecord> {
    records
        .iter()
        .filter(|record| matches_term(record, term))
        .cloned()
        .collect()
}
