//! Router builder for invoice routes

use crate::server::handlers::{
    AppState, create_invoice, delete_invoice, get_invoice, list_invoices, reset_invoices,
    update_invoice, upload_invoice,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Build invoice routes
///
/// - GET    /invoices          - List invoices (`?q=` filters)
/// - POST   /invoices          - Create an invoice
/// - POST   /invoices/reset    - Reset to seed data
/// - GET    /invoices/{id}     - Get an invoice
/// - PATCH  /invoices/{id}     - Update status
/// - DELETE /invoices/{id}     - Delete an invoice
pub fn build_invoice_routes(state: AppState) -> Router {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/reset", post(reset_invoices))
        .route(
            "/invoices/{id}",
            get(get_invoice).patch(update_invoice).delete(delete_invoice),
        )
        .with_state(state)
}

/// Build the upload route
///
/// - POST /invoices/upload - Extract and store one file
///
/// The body limit is raised to the configured maximum upload size. Bodies
/// over it are answered as `FILE_TOO_LARGE` by the handler.
pub fn build_upload_routes(state: AppState, max_file_bytes: usize) -> Router {
    Router::new()
        .route("/invoices/upload", post(upload_invoice))
        .layer(DefaultBodyLimit::max(max_file_bytes))
        .with_state(state)
}
