//! Invoice entity, candidate and patch types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Approval status of an invoice record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Approved,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Approved => "approved",
        }
    }

    /// The status a UI toggle moves to: approved goes back to pending,
    /// everything else becomes approved.
    pub fn toggled(self) -> Self {
        match self {
            InvoiceStatus::Approved => InvoiceStatus::Pending,
            InvoiceStatus::Pending => InvoiceStatus::Approved,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "approved" => Ok(InvoiceStatus::Approved),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

/// A stored invoice
///
/// `id` and `status` are owned by the store: callers never choose them at
/// creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: String,
    pub invoice_number: String,
    #[serde(rename = "type")]
    pub invoice_type: String,
    pub date: String,
    pub amount: f64,
    pub vendor: String,
    pub status: InvoiceStatus,
}

impl InvoiceRecord {
    /// Build a pending record from a validated candidate
    pub fn from_new(id: String, new: NewInvoice) -> Self {
        Self {
            id,
            invoice_number: new.invoice_number,
            invoice_type: new.invoice_type,
            date: new.date,
            amount: new.amount,
            vendor: new.vendor,
            status: InvoiceStatus::Pending,
        }
    }
}

/// Caller-proposed fields for a new record, before validation
///
/// Every field is optional so that validation can name exactly what is
/// missing. `amount` is kept as raw JSON so a non-numeric amount is reported
/// as a validation error rather than a decoding failure. Any `id` or `status`
/// sent alongside is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub invoice_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl InvoiceCandidate {
    /// Convenience constructor for a fully populated candidate
    pub fn new(
        invoice_number: impl Into<String>,
        invoice_type: impl Into<String>,
        date: impl Into<String>,
        amount: f64,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            invoice_number: Some(invoice_number.into()),
            invoice_type: Some(invoice_type.into()),
            date: Some(date.into()),
            amount: Some(Value::from(amount)),
            vendor: Some(vendor.into()),
        }
    }
}

/// A candidate that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub invoice_type: String,
    pub date: String,
    pub amount: f64,
    pub vendor: String,
}

/// Partial update of a record
///
/// Only `status` is mutable; `id` and `invoiceNumber` cannot be expressed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvoicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
}

impl InvoicePatch {
    pub fn status(status: InvoiceStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
    }

    /// Shallow-merge the patch into `record`
    pub fn apply(&self, record: &mut InvoiceRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}

/// The default dataset a store starts from and resets to
pub fn seed_invoices() -> Vec<InvoiceRecord> {
    vec![
        InvoiceRecord {
            id: "1".to_string(),
            invoice_number: "INV123456".to_string(),
            invoice_type: "VAT Special Invoice".to_string(),
            date: "2025-03-15".to_string(),
            amount: 12500.00,
            vendor: "Premium Supplier A".to_string(),
            status: InvoiceStatus::Approved,
        },
        InvoiceRecord {
            id: "2".to_string(),
            invoice_number: "INV123457".to_string(),
            invoice_type: "VAT General Invoice".to_string(),
            date: "2025-03-10".to_string(),
            amount: 8750.50,
            vendor: "Standard Supplier B".to_string(),
            status: InvoiceStatus::Pending,
        },
        InvoiceRecord {
            id: "3".to_string(),
            invoice_number: "INV123458".to_string(),
            invoice_type: "Electronic Invoice".to_string(),
            date: "2025-03-05".to_string(),
            amount: 3250.00,
            vendor: "Premium Supplier A".to_string(),
            status: InvoiceStatus::Approved,
        },
    ]
}
