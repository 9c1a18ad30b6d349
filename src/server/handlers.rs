//! HTTP handlers for invoice operations

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{BytesRejection, JsonRejection},
    },
    http::{HeaderMap, StatusCode, header::CONTENT_LENGTH, header::CONTENT_TYPE},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::core::extraction::{ExtractionError, is_supported_mime};
use crate::core::{
    InvoiceCandidate, InvoiceError, InvoicePatch, InvoiceRecord, InvoiceStore, SearchParams,
    filter_records,
};
use crate::ingest::{IngestError, IngestService, UploadFile};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvoiceStore>,
    pub ingest: Option<IngestService>,
}

/// Query parameters of the upload route
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UploadParams {
    /// Original file name, used in logs
    pub name: Option<String>,
}

/// List invoices, optionally filtered by `?q=`
///
/// GET /invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<InvoiceRecord>>, InvoiceError> {
    let records = state.store.list_all().await?;
    Ok(Json(filter_records(&records, params.term())))
}

/// Get one invoice
///
/// GET /invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceRecord>, InvoiceError> {
    state
        .store
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| InvoiceError::not_found(&id))
}

/// Create an invoice from a candidate
///
/// POST /invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<InvoiceCandidate>, JsonRejection>,
) -> Result<(StatusCode, Json<InvoiceRecord>), InvoiceError> {
    let Json(candidate) = payload?;
    let record = state.store.create(candidate).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Apply a partial update (status only)
///
/// PATCH /invoices/{id}
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<InvoicePatch>, JsonRejection>,
) -> Result<Json<InvoiceRecord>, InvoiceError> {
    let Json(patch) = payload?;
    let record = state.store.update(&id, patch).await?;
    tracing::debug!(invoice_id = %record.id, status = %record.status, "invoice updated");
    Ok(Json(record))
}

/// Delete an invoice; unknown ids are not an error
///
/// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, InvoiceError> {
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reset the store to its seed set
///
/// POST /invoices/reset
pub async fn reset_invoices(State(state): State<AppState>) -> Result<StatusCode, InvoiceError> {
    state.store.clear().await?;
    tracing::info!("invoice store reset to seed data");
    Ok(StatusCode::NO_CONTENT)
}

/// Run one uploaded file through the extraction collaborator and store it
///
/// POST /invoices/upload?name=scan.pdf with the raw file as body and its
/// mime type as `Content-Type`. A body over the upload limit is answered
/// like any other rejected file.
pub async fn upload_invoice(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<InvoiceRecord>), IngestError> {
    let ingest = state
        .ingest
        .as_ref()
        .ok_or_else(|| InvoiceError::Internal("uploads are not configured".to_string()))?;

    let mime_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .unwrap_or("application/octet-stream");

    let body = body.map_err(|rejection| {
        upload_rejection(rejection, &headers, mime_type, ingest.max_file_bytes())
    })?;

    let file = UploadFile::new(
        params.name.unwrap_or_else(|| "upload".to_string()),
        mime_type,
        body.to_vec(),
    );

    let record = ingest.ingest_file(&file).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

fn upload_rejection(
    rejection: BytesRejection,
    headers: &HeaderMap,
    mime_type: &str,
    limit: usize,
) -> IngestError {
    if !is_supported_mime(mime_type) {
        return ExtractionError::UnsupportedType {
            mime_type: mime_type.to_string(),
        }
        .into();
    }
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let size = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .filter(|&size| size > limit)
            .unwrap_or(limit + 1);
        return ExtractionError::TooLarge { size, limit }.into();
    }
    InvoiceError::Internal(rejection.body_text()).into()
}
