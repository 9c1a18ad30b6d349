//! REST API exposure
//!
//! This module provides REST-specific routing. It consumes a `ServerHost`
//! and produces an Axum `Router`.

use super::super::host::ServerHost;
use crate::server::handlers::AppState;
use crate::server::router::{build_invoice_routes, build_upload_routes};
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Invoice routes
    /// - The upload route, when the host accepts uploads
    /// - Custom routes
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let state = AppState {
            store: host.store.clone(),
            ingest: host.ingest.clone(),
        };

        let mut app = Self::health_routes().merge(build_invoice_routes(state.clone()));

        if host.accepts_uploads() {
            app = app.merge(build_upload_routes(
                state,
                host.ingest_config.max_file_bytes,
            ));
        }

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "invoice-desk"
        }))
    }
}
