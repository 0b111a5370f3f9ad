//! # Data Models
//!
//! Domain types shared across the Payment Gateway Admin API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod payment;
pub mod provider;

pub use payment::{
    BankInstallments, CardDetails, InstallmentOption, PaymentOutcome, PaymentRecord,
    PaymentRequest, PaymentStatus,
};
pub use provider::{Provider, ProviderConfig, ProviderDraft, ProviderKind, ProviderUpdate};

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "payadmin".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
