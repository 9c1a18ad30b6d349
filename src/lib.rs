//! # Invoice Desk
//!
//! A small invoice record store with a REST surface, built to sit behind an
//! AI-assisted invoice ingestion front end.
//!
//! ## Features
//!
//! - **Validated Records**: Candidates are checked for the five required
//!   fields and a numeric amount before they are stored
//! - **Unique Invoice Numbers**: Duplicates are rejected atomically, even
//!   under concurrent uploads
//! - **Pluggable Storage**: In-memory, JSON file and LMDB backends behind
//!   the [`InvoiceStore`](core::InvoiceStore) trait
//! - **Seed Data**: Every store starts from, and resets to, a known sample set
//! - **Upload Ingestion**: Files go through an injected
//!   [`InvoiceExtractor`](core::InvoiceExtractor) and land in the store
//! - **Configuration-Based**: Backend, bind address and limits via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_desk::prelude::*;
//!
//! let store = InMemoryInvoiceStore::new();
//!
//! let record = store
//!     .create(InvoiceCandidate::new(
//!         "INV999",
//!         "VAT General Invoice",
//!         "2025-04-01",
//!         100.0,
//!         "Acme",
//!     ))
//!     .await?;
//! assert_eq!(record.status, InvoiceStatus::Pending);
//!
//! toggle_status(&store, &record.id).await?; // now approved
//!
//! ServerBuilder::new()
//!     .with_store(store)
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod ingest;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ExtractionError, InvoiceCandidate, InvoiceError, InvoiceExtractor, InvoicePatch,
        InvoiceRecord, InvoiceStatus, InvoiceStore, SearchParams, StorageError, StoreResult,
        ValidationError, filter_records, seed_invoices, toggle_status,
    };

    // === Ingestion ===
    pub use crate::ingest::{IngestError, IngestService, UploadFile, UploadOutcome};

    // === Storage ===
    #[cfg(feature = "lmdb")]
    pub use crate::storage::LmdbInvoiceStore;
    pub use crate::storage::{DEFAULT_STORAGE_KEY, InMemoryInvoiceStore, JsonFileInvoiceStore};

    // === Config ===
    pub use crate::config::{AppConfig, IngestConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
