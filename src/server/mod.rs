//! Server module for building the invoice HTTP API
//!
//! This module provides a `ServerBuilder` that registers:
//! - CRUD and search routes for invoices
//! - An upload/extraction route when an extractor is configured
//! - Health check routes

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use handlers::AppState;
pub use host::ServerHost;
