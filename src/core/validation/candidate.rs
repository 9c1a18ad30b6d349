//! Validation of a new-invoice candidate

use super::validators::{numeric, required};
use crate::core::error::ValidationError;
use crate::core::invoice::{InvoiceCandidate, NewInvoice};
use serde_json::Value;

/// Required fields, in the order they are reported
pub const REQUIRED_FIELDS: [&str; 5] = ["invoiceNumber", "type", "date", "amount", "vendor"];

fn text(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// Check a candidate and turn it into a [`NewInvoice`]
///
/// Missing fields are all reported together. The numeric check on `amount`
/// only runs once every field is present.
pub fn validate_candidate(candidate: &InvoiceCandidate) -> Result<NewInvoice, ValidationError> {
    let values = [
        text(&candidate.invoice_number),
        text(&candidate.invoice_type),
        text(&candidate.date),
        candidate.amount.clone().unwrap_or(Value::Null),
        text(&candidate.vendor),
    ];

    let is_present = required();
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .zip(values.iter())
        .filter_map(|(&field, value)| is_present(field, value).err().map(|_| field.to_string()))
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let not_numeric = || ValidationError::NotNumeric {
        field: "amount".to_string(),
    };
    numeric()("amount", &values[3]).map_err(|_| not_numeric())?;
    let amount = values[3].as_f64().ok_or_else(not_numeric)?;

    let [invoice_number, invoice_type, date, _, vendor] = values;
    Ok(NewInvoice {
        invoice_number: into_string(invoice_number),
        invoice_type: into_string(invoice_type),
        date: into_string(date),
        amount,
        vendor: into_string(vendor),
    })
}

fn into_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
