//! Payment dispatch service
//!
//! Resolves the single active provider, validates checkout requests against
//! its configuration, and delegates to the per-gateway [`Gateway`]
//! implementations. Every attempt is appended to the payment record log.

use tracing::{info, warn};

use crate::gateways::{self, Gateway, GatewayError};
use crate::models::{BankInstallments, PaymentOutcome, PaymentRequest, PaymentStatus, Provider};
use crate::store::{PaymentRecordStore, ProviderStore};

/// Error type for payment operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum PaymentError {
    #[error("amount must be a positive number")]
    InvalidAmount,

    #[error("no active payment provider is configured")]
    NoActiveProvider,

    #[error("provider credentials are missing or empty")]
    InvalidCredentials,

    #[error("installment count must be between 1 and {limit}")]
    InstallmentLimitExceeded { limit: u32 },

    #[error("invalid test card; use {expected} for this provider in test mode")]
    InvalidTestCard { expected: &'static str },

    #[error("provider {provider} is unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("payment failed: {message}")]
    PaymentFailed { message: String },
}

/// Orchestrates installment quoting and payment processing against the
/// active provider.
#[derive(Clone)]
pub struct PaymentService {
    providers: ProviderStore,
    records: PaymentRecordStore,
    http: reqwest::Client,
}

impl PaymentService {
    pub fn new(providers: ProviderStore, records: PaymentRecordStore) -> Self {
        Self {
            providers,
            records,
            http: reqwest::Client::new(),
        }
    }

    fn active_provider(&self) -> Result<Provider, PaymentError> {
        self.providers
            .active()
            .ok_or(PaymentError::NoActiveProvider)
    }

    /// Quote per-bank installment tables for an amount using the active
    /// provider, capped at its installment ceiling.
    pub async fn compute_installments(
        &self,
        amount: f64,
    ) -> Result<Vec<BankInstallments>, PaymentError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidAmount);
        }

        let provider = self.active_provider()?;
        let gateway = gateways::resolve(provider.kind);
        let mut banks = gateway
            .installment_rates(&provider, amount, &self.http)
            .await
            .map_err(|err| {
                warn!(provider = %provider.kind, error = %err, "installment quote failed");
                PaymentError::ProviderUnavailable {
                    provider: provider.kind.to_string(),
                    message: err.to_string(),
                }
            })?;

        // The quote honors the same ceiling process_payment enforces.
        for bank in &mut banks {
            bank.installments
                .retain(|tier| tier.count <= provider.max_installments);
        }
        banks.retain(|bank| !bank.installments.is_empty());
        Ok(banks)
    }

    /// Run one payment attempt through the active provider and record it.
    pub async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentOutcome, PaymentError> {
        let provider = self.active_provider()?;

        if provider.config.api_key.trim().is_empty()
            || provider.config.secret_key.trim().is_empty()
        {
            return Err(PaymentError::InvalidCredentials);
        }

        if request.installment == 0 || request.installment > provider.max_installments {
            return Err(PaymentError::InstallmentLimitExceeded {
                limit: provider.max_installments,
            });
        }

        if provider.is_test_mode {
            let expected = gateways::success_test_card(provider.kind);
            if request.card_details.number != expected {
                return Err(PaymentError::InvalidTestCard { expected });
            }
        }

        let gateway = gateways::resolve(provider.kind);
        match gateway.charge(&provider, request, &self.http).await {
            Ok(outcome) => {
                let status = match &outcome {
                    PaymentOutcome::Success { .. } => PaymentStatus::Success,
                    PaymentOutcome::Redirect { .. } => PaymentStatus::Pending,
                };
                self.records.append(
                    provider.id,
                    request.amount,
                    &request.currency,
                    request.installment,
                    status,
                    None,
                );
                info!(
                    provider = %provider.kind,
                    amount = request.amount,
                    installment = request.installment,
                    "payment processed"
                );
                Ok(outcome)
            }
            Err(err) => {
                self.records.append(
                    provider.id,
                    request.amount,
                    &request.currency,
                    request.installment,
                    PaymentStatus::Failed,
                    Some(serde_json::json!({ "error": err.to_string() })),
                );
                warn!(provider = %provider.kind, error = %err, "payment failed");
                Err(match err {
                    GatewayError::Upstream { message } | GatewayError::Declined { message } => {
                        PaymentError::PaymentFailed { message }
                    }
                })
            }
        }
    }

    /// All recorded payment attempts, oldest first.
    pub fn payment_history(&self) -> Vec<crate::models::PaymentRecord> {
        self.records.list()
    }
}
