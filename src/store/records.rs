//! Payment record store
//!
//! Append-only in-memory log of payment attempts backing `GET /payments`.
//! Records hold a logical `provider_id` only; deleting a provider orphans
//! its records and that is fine.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::models::{PaymentRecord, PaymentStatus};

/// Append-only log of payment attempts. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct PaymentRecordStore {
    inner: Arc<RwLock<Vec<PaymentRecord>>>,
}

impl PaymentRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in append order.
    pub fn list(&self) -> Vec<PaymentRecord> {
        self.inner.read().unwrap().clone()
    }

    /// Append one attempt and return the stored record.
    pub fn append(
        &self,
        provider_id: u64,
        amount: f64,
        currency: &str,
        installment: u32,
        status: PaymentStatus,
        metadata: Option<serde_json::Value>,
    ) -> PaymentRecord {
        let record = PaymentRecord {
            id: Uuid::new_v4(),
            provider_id,
            amount,
            currency: currency.to_string(),
            installment,
            status,
            created_at: Utc::now(),
            metadata,
        };
        self.inner.write().unwrap().push(record.clone());
        record
    }
}
