//! Upload ingestion: file → extraction collaborator → candidate → store
//!
//! Files are independent. [`IngestService::ingest_all`] runs them
//! concurrently and reports one outcome per file; a failure on one file never
//! prevents the others from being stored. The store's own write
//! serialization decides which of two uploads with the same invoice number
//! wins.

use crate::config::IngestConfig;
use crate::core::error::{ErrorResponse, InvoiceError};
use crate::core::extraction::{ExtractionError, InvoiceExtractor, check_upload, parse_extraction};
use crate::core::{InvoiceRecord, InvoiceStore};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::future::join_all;
use std::sync::Arc;

/// One uploaded file
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Why a single file did not become a record
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Store(#[from] InvoiceError),
}

impl IngestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::Extraction(ExtractionError::UnsupportedType { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            IngestError::Extraction(ExtractionError::TooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            IngestError::Extraction(ExtractionError::Collaborator(_)) => StatusCode::BAD_GATEWAY,
            IngestError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IngestError::Store(e) => e.status_code(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            IngestError::Extraction(ExtractionError::UnsupportedType { .. }) => {
                "UNSUPPORTED_FILE_TYPE"
            }
            IngestError::Extraction(ExtractionError::TooLarge { .. }) => "FILE_TOO_LARGE",
            IngestError::Extraction(ExtractionError::Collaborator(_)) => "EXTRACTION_FAILED",
            IngestError::Extraction(_) => "EXTRACTION_UNUSABLE",
            IngestError::Store(e) => e.error_code(),
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        match self {
            IngestError::Store(e) => e.into_response(),
            other => {
                let body = ErrorResponse {
                    code: other.error_code().to_string(),
                    message: other.to_string(),
                    details: None,
                };
                (other.status_code(), Json(body)).into_response()
            }
        }
    }
}

/// Result of ingesting one file
#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<InvoiceRecord, IngestError>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drives uploads through the extraction collaborator into the store
#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn InvoiceStore>,
    extractor: Arc<dyn InvoiceExtractor>,
    config: IngestConfig,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn InvoiceStore>,
        extractor: Arc<dyn InvoiceExtractor>,
        config: IngestConfig,
    ) -> Self {
        Self {
            store,
            extractor,
            config,
        }
    }

    /// Largest accepted upload, in bytes
    pub fn max_file_bytes(&self) -> usize {
        self.config.max_file_bytes
    }

    /// Check, extract, normalize and store one file
    pub async fn ingest_file(&self, file: &UploadFile) -> Result<InvoiceRecord, IngestError> {
        check_upload(&file.mime_type, file.bytes.len(), self.config.max_file_bytes)?;

        tracing::debug!(file = %file.name, mime_type = %file.mime_type, size = file.bytes.len(), "extracting invoice");
        let text = self.extractor.extract(&file.bytes, &file.mime_type).await?;
        let candidate = parse_extraction(&text)?;

        let record = self.store.create(candidate).await?;
        tracing::info!(file = %file.name, invoice_id = %record.id, invoice_number = %record.invoice_number, "invoice ingested");
        Ok(record)
    }

    /// Ingest every file concurrently, one outcome per file in input order
    pub async fn ingest_all(&self, files: Vec<UploadFile>) -> Vec<UploadOutcome> {
        let outcomes = join_all(files.iter().map(|file| async move {
            let result = self.ingest_file(file).await;
            if let Err(e) = &result {
                tracing::warn!(file = %file.name, error = %e, "invoice ingestion failed");
            }
            UploadOutcome {
                file_name: file.name.clone(),
                result,
            }
        }))
        .await;

        let stored = outcomes.iter().filter(|o| o.is_success()).count();
        tracing::info!(files = outcomes.len(), stored, "upload batch processed");
        outcomes
    }
}
