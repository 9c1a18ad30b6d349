//! Shared test harness for invoice store backends
//!
//! Provides candidate builders, a scripted extractor, and the
//! `invoice_store_tests!` / `rest_integration_tests!` macros that every
//! backend test file invokes.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]


#[macro_use]
pub mod rest_tests;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

use invoice_desk::core::{ExtractionError, InvoiceCandidate, InvoiceExtractor, InvoiceRecord};

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A complete candidate with a caller-chosen invoice number
pub fn candidate(invoice_number: &str) -> InvoiceCandidate {
    InvoiceCandidate::new(
        invoice_number,
        "VAT General Invoice",
        "2025-04-01",
        100.0,
        "Acme",
    )
}

/// The JSON body a client would POST for `candidate(invoice_number)`
pub fn candidate_json(invoice_number: &str) -> Value {
    json!({
        "invoiceNumber": invoice_number,
        "type": "VAT General Invoice",
        "date": "2025-04-01",
        "amount": 100,
        "vendor": "Acme"
    })
}

pub fn ids(records: &[InvoiceRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

pub fn invoice_numbers(records: &[InvoiceRecord]) -> Vec<&str> {
    records.iter().map(|r| r.invoice_number.as_str()).collect()
}

// ---------------------------------------------------------------------------
// ScriptedExtractor: answers by payload, counts calls
// ---------------------------------------------------------------------------

/// Extractor stub whose answer is chosen by the uploaded payload
///
/// Payloads without a script get a collaborator failure.
#[derive(Default)]
pub struct ScriptedExtractor {
    answers: HashMap<Vec<u8>, String>,
    calls: Mutex<usize>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `payload` with `text`
    pub fn answer(mut self, payload: &[u8], text: impl Into<String>) -> Self {
        self.answers.insert(payload.to_vec(), text.into());
        self
    }

    /// Answer `payload` with a well-formed invoice for `invoice_number`
    pub fn invoice(self, payload: &[u8], invoice_number: &str) -> Self {
        let text = candidate_json(invoice_number).to_string();
        self.answer(payload, text)
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl InvoiceExtractor for ScriptedExtractor {
    async fn extract(&self, payload: &[u8], _mime_type: &str) -> Result<String, ExtractionError> {
        *self.calls.lock().unwrap() += 1;
        self.answers
            .get(payload)
            .cloned()
            .ok_or_else(|| ExtractionError::Collaborator("model unavailable".to_string()))
    }
}
