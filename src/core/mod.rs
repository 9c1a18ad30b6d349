//! Core module containing the invoice model, the store contract and the
//! rules every backend shares

pub mod collection;
pub mod error;
pub mod extraction;
pub mod invoice;
pub mod query;
pub mod service;
pub mod status;
pub mod validation;

pub use collection::InvoiceCollection;
pub use error::{InvoiceError, StorageError, StoreResult, ValidationError};
pub use extraction::{ExtractionError, InvoiceExtractor};
pub use invoice::{
    InvoiceCandidate, InvoicePatch, InvoiceRecord, InvoiceStatus, NewInvoice, seed_invoices,
};
pub use query::{SearchParams, filter_records};
pub use service::InvoiceStore;
pub use status::toggle_status;
