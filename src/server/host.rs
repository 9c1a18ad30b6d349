//! Server host for transport-agnostic API exposure
//!
//! The host holds everything an exposure needs to serve the API. It is the
//! single source of truth for the application state.

use crate::config::IngestConfig;
use crate::core::{InvoiceExtractor, InvoiceStore};
use crate::ingest::IngestService;
use std::sync::Arc;

/// Host context containing all server state
pub struct ServerHost {
    /// Authoritative invoice store
    pub store: Arc<dyn InvoiceStore>,

    /// Upload pipeline, present only when an extractor was provided
    pub ingest: Option<IngestService>,

    /// Upload limits
    pub ingest_config: IngestConfig,
}

impl ServerHost {
    pub fn new(store: Arc<dyn InvoiceStore>, ingest_config: IngestConfig) -> Self {
        Self {
            store,
            ingest: None,
            ingest_config,
        }
    }

    /// Enable uploads through `extractor`
    pub fn with_extractor(mut self, extractor: Arc<dyn InvoiceExtractor>) -> Self {
        self.ingest = Some(IngestService::new(
            self.store.clone(),
            extractor,
            self.ingest_config.clone(),
        ));
        self
    }

    /// Whether the upload route is served
    pub fn accepts_uploads(&self) -> bool {
        self.ingest.is_some()
    }
}
