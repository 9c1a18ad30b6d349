//! Boundary with the external invoice extraction collaborator
//!
//! The collaborator (typically a generative-AI vision model) receives the raw
//! file bytes and a mime type and answers with best-effort JSON text. Nothing
//! in this crate talks to a model vendor: callers inject an
//! [`InvoiceExtractor`]. This module only turns the collaborator's answer into
//! an [`InvoiceCandidate`] the store can validate.

use crate::core::invoice::InvoiceCandidate;
use crate::core::validation::REQUIRED_FIELDS;
use crate::core::validation::validators::required;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Failures between receiving a file and producing a candidate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported file type '{mime_type}'")]
    UnsupportedType { mime_type: String },

    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("extraction service failed: {0}")]
    Collaborator(String),

    #[error("failed to parse invoice data: {0}")]
    Unparsable(String),

    #[error("extracted data is not an invoice object: {0}")]
    Malformed(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// External collaborator that reads an invoice file
#[async_trait]
pub trait InvoiceExtractor: Send + Sync {
    /// Return the collaborator's raw JSON text for one file
    async fn extract(&self, payload: &[u8], mime_type: &str) -> Result<String, ExtractionError>;
}

/// Whether the collaborator accepts this mime type (any image, or PDF)
pub fn is_supported_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/") || mime_type == "application/pdf"
}

/// Reject a file before it reaches the collaborator
pub fn check_upload(mime_type: &str, size: usize, limit: usize) -> Result<(), ExtractionError> {
    if !is_supported_mime(mime_type) {
        return Err(ExtractionError::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }
    if size > limit {
        return Err(ExtractionError::TooLarge { size, limit });
    }
    Ok(())
}

/// Parse collaborator text into a candidate
///
/// Blank output is treated as an empty object.
pub fn parse_extraction(text: &str) -> Result<InvoiceCandidate, ExtractionError> {
    let text = if text.trim().is_empty() { "{}" } else { text };
    let value: Value =
        serde_json::from_str(text).map_err(|e| ExtractionError::Unparsable(e.to_string()))?;
    normalize_extraction(value)
}

/// Coerce a collaborator JSON value into a candidate
///
/// An array answer contributes its first element. All five fields must be
/// present; text fields are stringified and `amount` is read as a float,
/// accepting numeric strings and falling back to `0`.
pub fn normalize_extraction(value: Value) -> Result<InvoiceCandidate, ExtractionError> {
    let value = match value {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(ExtractionError::Malformed(format!(
                "expected a JSON object, got {}",
                kind(&other)
            )));
        }
    };

    let is_present = required();
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|&&field| is_present(field, fields.get(field).unwrap_or(&Value::Null)).is_err())
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ExtractionError::MissingFields(missing));
    }

    Ok(InvoiceCandidate {
        invoice_number: Some(text_field(&fields, "invoiceNumber")),
        invoice_type: Some(text_field(&fields, "type")),
        date: Some(text_field(&fields, "date")),
        amount: Some(Value::from(amount_field(&fields))),
        vendor: Some(text_field(&fields, "vendor")),
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn text_field(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn amount_field(fields: &Map<String, Value>) -> f64 {
    let parsed = match fields.get("amount") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_leading_float(s),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Parse the longest numeric prefix of `s`, after leading whitespace
///
/// `"12,500.00"` reads as `12`, `"99.5 USD"` as `99.5`.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let prefix_len = s
        .char_indices()
        .take_while(|&(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;

    (1..=prefix_len)
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
}
