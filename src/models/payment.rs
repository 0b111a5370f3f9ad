//! Payment request/response models
//!
//! Types crossing the checkout boundary: card details, the process-payment
//! request, the synchronous/redirect outcome, installment quote tables, and
//! the persisted payment record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::provider::ProviderKind;

/// Card details submitted with a checkout request.
///
/// Never persisted; in test mode only the number is inspected, against the
/// provider's canonical test card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    #[schema(example = "5528790000000008")]
    pub number: String,
    #[schema(example = "12")]
    pub expiry_month: String,
    #[schema(example = "2030")]
    pub expiry_year: String,
    #[schema(example = "123")]
    pub cvv: String,
    #[schema(example = "Ayşe Yılmaz")]
    pub holder_name: String,
}

/// Request body for `POST /payment/process`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[schema(example = 9600.0)]
    pub amount: f64,
    #[schema(example = "TRY")]
    pub currency: String,
    #[serde(default = "default_installment")]
    #[schema(example = 3)]
    pub installment: u32,
    pub card_details: CardDetails,
    /// Where redirect-flow gateways send the customer back afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

fn default_installment() -> u32 {
    1
}

/// Outcome of a dispatched payment attempt.
///
/// Synchronous gateways complete in-band; redirect gateways hand the
/// customer a provider-hosted page instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PaymentOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        provider: ProviderKind,
        transaction_id: String,
        amount: f64,
        currency: String,
    },
    #[serde(rename_all = "camelCase")]
    Redirect {
        provider: ProviderKind,
        redirect_url: String,
        installment: u32,
    },
}

/// One installment tier offered by a bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentOption {
    /// Number of monthly payments; 1 means single charge.
    pub count: u32,
    pub monthly_amount: f64,
    pub total_amount: f64,
}

/// Installment table for a single bank, tiers ascending by count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankInstallments {
    #[schema(example = "Bonus")]
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_logo: Option<String>,
    pub installments: Vec<InstallmentOption>,
}

/// Terminal state of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failed,
    Pending,
}

/// A recorded payment attempt, listed by `GET /payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    /// Logical reference to the provider that handled the attempt. Not a
    /// foreign key; deleting the provider orphans the record.
    pub provider_id: u64,
    pub amount: f64,
    pub currency: String,
    pub installment: u32,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}
