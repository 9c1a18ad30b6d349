//! REST integration test macro for store backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that run
//! a store through the full server stack:
//! JSON → HTTP request → handler → InvoiceStore → HTTP response → JSON.

/// Generate a REST integration test suite for a store backend.
///
/// `$factory` must produce a fresh, seeded `impl InvoiceStore + 'static`.
///
/// # Generated Tests
///
/// ## Listing
/// - `test_rest_health` - GET /health is 200
/// - `test_rest_list_seed` - GET /invoices returns the seed set
/// - `test_rest_list_search` - `?q=premium` returns ids 1 and 3
///
/// ## Create
/// - `test_rest_create` - POST 201, pending, listed afterwards
/// - `test_rest_create_missing_fields` - 400 with `details.fields`
/// - `test_rest_create_duplicate` - 409
/// - `test_rest_create_invalid_json` - 400 INVALID_JSON
///
/// ## Update / Delete / Reset
/// - `test_rest_patch_status`, `test_rest_patch_unknown_id`, `test_rest_patch_rejects_other_fields`
/// - `test_rest_delete_twice`, `test_rest_reset`
///
/// ## Upload
/// - `test_rest_upload_disabled_without_extractor`
/// - `test_rest_upload_success`, `test_rest_upload_unsupported_type`
/// - `test_rest_upload_collaborator_failure`, `test_rest_upload_duplicate`
/// - `test_rest_upload_too_large`
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::body::Bytes;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use invoice_desk::config::IngestConfig;
            use invoice_desk::core::InvoiceExtractor;
            use invoice_desk::server::ServerBuilder;
            use serde_json::{Value, json};
            use std::sync::Arc;

            fn make_server() -> TestServer {
                let router = ServerBuilder::new().with_store($factory).build().unwrap();
                TestServer::new(router)
            }

            fn make_upload_server(extractor: Arc<ScriptedExtractor>) -> TestServer {
                let router = ServerBuilder::new()
                    .with_store($factory)
                    .with_shared_extractor(extractor as Arc<dyn InvoiceExtractor>)
                    .build()
                    .unwrap();
                TestServer::new(router)
            }

            fn body_ids(body: &Value) -> Vec<String> {
                body.as_array()
                    .unwrap()
                    .iter()
                    .map(|r| r["id"].as_str().unwrap().to_string())
                    .collect()
            }

            // ==============================================================
            // Listing
            // ==============================================================

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server();
                let response = server.get("/health").await;
                response.assert_status_ok();
                assert_eq!(response.json::<Value>()["status"], "ok");
            }

            #[tokio::test]
            async fn test_rest_list_seed() {
                let server = make_server();
                let response = server.get("/invoices").await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body_ids(&body), vec!["1", "2", "3"]);
                assert_eq!(body[0]["invoiceNumber"], "INV123456");
                assert_eq!(body[0]["type"], "VAT Special Invoice");
                assert_eq!(body[0]["amount"], 12500.0);
                assert_eq!(body[0]["status"], "approved");
            }

            #[tokio::test]
            async fn test_rest_list_search() {
                let server = make_server();
                let response = server.get("/invoices").add_query_param("q", "premium").await;
                response.assert_status_ok();
                assert_eq!(body_ids(&response.json::<Value>()), vec!["1", "3"]);
            }

            // ==============================================================
            // Create
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server();

                let response = server.post("/invoices").json(&candidate_json("INV999")).await;
                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(body["invoiceNumber"], "INV999");
                assert_eq!(body["status"], "pending");
                assert_eq!(body["amount"], 100.0);
                let id = body["id"].as_str().unwrap();

                let get = server.get(&format!("/invoices/{}", id)).await;
                get.assert_status_ok();
                assert_eq!(get.json::<Value>()["vendor"], "Acme");

                let list: Value = server.get("/invoices").await.json();
                assert_eq!(list.as_array().unwrap().len(), 4);
            }

            #[tokio::test]
            async fn test_rest_create_ignores_caller_status() {
                let server = make_server();
                let mut payload = candidate_json("INV-STATUS");
                payload["status"] = json!("approved");
                payload["id"] = json!("1");

                let response = server.post("/invoices").json(&payload).await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["status"], "pending");
                assert_ne!(body["id"], "1");
            }

            #[tokio::test]
            async fn test_rest_create_missing_fields() {
                let server = make_server();

                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "invoiceNumber": "INV-PARTIAL",
                        "date": "2025-04-01",
                        "amount": 10,
                        "vendor": ""
                    }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                assert_eq!(body["details"]["fields"], json!(["type", "vendor"]));
            }

            #[tokio::test]
            async fn test_rest_create_duplicate() {
                let server = make_server();

                let response = server.post("/invoices").json(&candidate_json("INV123457")).await;
                response.assert_status(StatusCode::CONFLICT);

                let body: Value = response.json();
                assert_eq!(body["code"], "DUPLICATE_INVOICE_NUMBER");
                assert_eq!(body["details"]["invoiceNumber"], "INV123457");

                let list: Value = server.get("/invoices").await.json();
                assert_eq!(list.as_array().unwrap().len(), 3);
            }

            #[tokio::test]
            async fn test_rest_create_invalid_json() {
                let server = make_server();

                let response = server
                    .post("/invoices")
                    .bytes(Bytes::from_static(b"{not json"))
                    .content_type("application/json")
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "INVALID_JSON");
            }

            // ==============================================================
            // Update / Delete / Reset
            // ==============================================================

            #[tokio::test]
            async fn test_rest_patch_status() {
                let server = make_server();

                let response = server
                    .patch("/invoices/2")
                    .json(&json!({ "status": "approved" }))
                    .await;
                response.assert_status_ok();
                assert_eq!(response.json::<Value>()["status"], "approved");

                let get: Value = server.get("/invoices/2").await.json();
                assert_eq!(get["status"], "approved");
                assert_eq!(get["invoiceNumber"], "INV123457");
            }

            #[tokio::test]
            async fn test_rest_patch_unknown_id() {
                let server = make_server();

                let response = server
                    .patch("/invoices/does-not-exist")
                    .json(&json!({ "status": "approved" }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(body["code"], "INVOICE_NOT_FOUND");
                assert_eq!(body["details"]["id"], "does-not-exist");
            }

            #[tokio::test]
            async fn test_rest_patch_rejects_other_fields() {
                let server = make_server();

                let response = server
                    .patch("/invoices/1")
                    .json(&json!({ "invoiceNumber": "INV-HIJACK" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let get: Value = server.get("/invoices/1").await.json();
                assert_eq!(get["invoiceNumber"], "INV123456");
            }

            #[tokio::test]
            async fn test_rest_delete_twice() {
                let server = make_server();

                server.delete("/invoices/1").await.assert_status(StatusCode::NO_CONTENT);
                server.delete("/invoices/1").await.assert_status(StatusCode::NO_CONTENT);
                server.get("/invoices/1").await.assert_status(StatusCode::NOT_FOUND);

                let list: Value = server.get("/invoices").await.json();
                assert_eq!(body_ids(&list), vec!["2", "3"]);
            }

            #[tokio::test]
            async fn test_rest_reset() {
                let server = make_server();

                server.post("/invoices").json(&candidate_json("INV-TEMP")).await;
                server.delete("/invoices/2").await;

                server.post("/invoices/reset").await.assert_status(StatusCode::NO_CONTENT);

                let list: Value = server.get("/invoices").await.json();
                assert_eq!(body_ids(&list), vec!["1", "2", "3"]);
            }

            // ==============================================================
            // Upload
            // ==============================================================

            #[tokio::test]
            async fn test_rest_upload_disabled_without_extractor() {
                let server = make_server();

                let response = server
                    .post("/invoices/upload")
                    .bytes(Bytes::from_static(b"scan"))
                    .content_type("image/png")
                    .await;
                assert!(response.status_code().is_client_error());
            }

            #[tokio::test]
            async fn test_rest_upload_success() {
                let extractor = Arc::new(ScriptedExtractor::new().invoice(b"scan-a", "INV-SCAN-A"));
                let server = make_upload_server(extractor.clone());

                let response = server
                    .post("/invoices/upload")
                    .add_query_param("name", "scan-a.png")
                    .bytes(Bytes::from_static(b"scan-a"))
                    .content_type("image/png")
                    .await;
                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(body["invoiceNumber"], "INV-SCAN-A");
                assert_eq!(body["status"], "pending");
                assert_eq!(extractor.calls(), 1);
            }

            #[tokio::test]
            async fn test_rest_upload_unsupported_type() {
                let extractor = Arc::new(ScriptedExtractor::new().invoice(b"notes", "INV-TXT"));
                let server = make_upload_server(extractor.clone());

                let response = server
                    .post("/invoices/upload")
                    .bytes(Bytes::from_static(b"notes"))
                    .content_type("text/plain")
                    .await;
                response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
                assert_eq!(response.json::<Value>()["code"], "UNSUPPORTED_FILE_TYPE");
                assert_eq!(extractor.calls(), 0);
            }

            #[tokio::test]
            async fn test_rest_upload_collaborator_failure() {
                let extractor = Arc::new(ScriptedExtractor::new());
                let server = make_upload_server(extractor);

                let response = server
                    .post("/invoices/upload")
                    .bytes(Bytes::from_static(b"unknown scan"))
                    .content_type("application/pdf")
                    .await;
                response.assert_status(StatusCode::BAD_GATEWAY);
                assert_eq!(response.json::<Value>()["code"], "EXTRACTION_FAILED");
            }

            #[tokio::test]
            async fn test_rest_upload_duplicate() {
                let extractor = Arc::new(ScriptedExtractor::new().invoice(b"old", "INV123456"));
                let server = make_upload_server(extractor);

                let response = server
                    .post("/invoices/upload")
                    .bytes(Bytes::from_static(b"old"))
                    .content_type("image/jpeg")
                    .await;
                response.assert_status(StatusCode::CONFLICT);
                assert_eq!(response.json::<Value>()["code"], "DUPLICATE_INVOICE_NUMBER");
            }

            #[tokio::test]
            async fn test_rest_upload_too_large() {
                let extractor = Arc::new(ScriptedExtractor::new().invoice(b"oversized", "INV-BIG"));
                let router = ServerBuilder::new()
                    .with_store($factory)
                    .with_shared_extractor(extractor.clone() as Arc<dyn InvoiceExtractor>)
                    .with_ingest_config(IngestConfig { max_file_bytes: 4 })
                    .build()
                    .unwrap();
                let server = TestServer::new(router);

                let response = server
                    .post("/invoices/upload")
                    .bytes(Bytes::from_static(b"oversized"))
                    .content_type("image/png")
                    .await;
                response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

                let body: Value = response.json();
                assert_eq!(body["code"], "FILE_TOO_LARGE");
                assert!(body["message"].as_str().unwrap().contains("limit is 4"));
                assert_eq!(extractor.calls(), 0);
            }
        }
    };
}
