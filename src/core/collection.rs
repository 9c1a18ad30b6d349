//! Ordered invoice collection shared by every storage backend
//!
//! Backends differ only in where the record set lives between operations;
//! the write rules (validation, uniqueness, append order, patching) live
//! here so that they are identical everywhere.

use crate::core::error::{InvoiceError, StoreResult};
use crate::core::invoice::{InvoiceCandidate, InvoicePatch, InvoiceRecord};
use crate::core::validation::validate_candidate;
use indexmap::IndexMap;
use uuid::Uuid;

/// Records keyed by id, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceCollection {
    records: IndexMap<String, InvoiceRecord>,
}

impl InvoiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted sequence, keeping its order
    pub fn from_records(records: Vec<InvoiceRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
        }
    }

    pub fn to_records(&self) -> Vec<InvoiceRecord> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&InvoiceRecord> {
        self.records.get(id)
    }

    pub fn contains_invoice_number(&self, invoice_number: &str) -> bool {
        self.records
            .values()
            .any(|record| record.invoice_number == invoice_number)
    }

    /// Validate a candidate and append it as a new pending record
    ///
    /// The collection is left untouched on any error.
    pub fn insert(&mut self, candidate: &InvoiceCandidate) -> StoreResult<InvoiceRecord> {
        let new = validate_candidate(candidate)?;

        if self.contains_invoice_number(&new.invoice_number) {
            return Err(InvoiceError::duplicate(new.invoice_number));
        }

        let id = self.fresh_id();
        let record = InvoiceRecord::from_new(id.clone(), new);
        self.records.insert(id, record.clone());

        Ok(record)
    }

    /// Merge a patch into an existing record, keeping its position
    pub fn update(&mut self, id: &str, patch: &InvoicePatch) -> StoreResult<InvoiceRecord> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| InvoiceError::not_found(id))?;

        patch.apply(record);

        Ok(record.clone())
    }

    /// Remove a record; returns whether one was present
    pub fn remove(&mut self, id: &str) -> bool {
        self.records.shift_remove(id).is_some()
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.records.contains_key(&id) {
                return id;
            }
        }
    }
}
