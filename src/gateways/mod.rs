//! Gateway implementations
//!
//! One module per supported payment gateway, all behind the [`Gateway`]
//! trait. Dispatch resolves a provider kind to its gateway through an
//! exhaustive match, so adding a kind without wiring a gateway fails to
//! compile.
//!
//! The production-mode request signatures are illustrative placeholders
//! shaped after each gateway's public documentation; they are not validated
//! against any real contract.

use async_trait::async_trait;

use crate::models::{BankInstallments, InstallmentOption, PaymentOutcome, PaymentRequest, Provider, ProviderKind};

pub mod iyzico;
pub mod paybull;
pub mod paynkolay;
pub mod paytr;

pub use iyzico::Iyzico;
pub use paybull::Paybull;
pub use paynkolay::Paynkolay;
pub use paytr::Paytr;

/// Error type for gateway operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The outbound call to the gateway failed (transport or non-2xx).
    #[error("{message}")]
    Upstream { message: String },
    /// The gateway answered but refused the payment.
    #[error("{message}")]
    Declined { message: String },
}

impl GatewayError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self::Declined {
            message: message.into(),
        }
    }
}

/// A payment gateway integration.
#[async_trait]
pub trait Gateway: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Quote per-bank installment tables for the given amount.
    ///
    /// Test mode returns a fixed illustrative table; production mode issues
    /// a signed request to the gateway's installment-rate endpoint.
    async fn installment_rates(
        &self,
        provider: &Provider,
        amount: f64,
        http: &reqwest::Client,
    ) -> Result<Vec<BankInstallments>, GatewayError>;

    /// Execute one payment attempt, either completing it synchronously or
    /// producing a redirect to a gateway-hosted page.
    async fn charge(
        &self,
        provider: &Provider,
        request: &PaymentRequest,
        http: &reqwest::Client,
    ) -> Result<PaymentOutcome, GatewayError>;
}

/// Resolve the gateway for a provider kind.
pub fn resolve(kind: ProviderKind) -> &'static dyn Gateway {
    match kind {
        ProviderKind::Iyzico => &Iyzico,
        ProviderKind::Paytr => &Paytr,
        ProviderKind::Paynkolay => &Paynkolay,
        ProviderKind::Paybull => &Paybull,
    }
}

/// The canonical success test card for each gateway. In test mode any other
/// number is rejected before dispatch.
pub fn success_test_card(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Iyzico => "5528790000000008",
        ProviderKind::Paytr => "4355084355084358",
        ProviderKind::Paynkolay => "4159560047417732",
        ProviderKind::Paybull => "4355084355084358",
    }
}

/// Default API endpoint per kind and mode, used when the provider config
/// carries no explicit endpoint.
pub fn default_endpoint(kind: ProviderKind, test_mode: bool) -> &'static str {
    match (kind, test_mode) {
        (ProviderKind::Iyzico, true) => "https://sandbox-api.iyzipay.com",
        (ProviderKind::Iyzico, false) => "https://api.iyzipay.com",
        (ProviderKind::Paytr, true) => "https://test-api.paytr.com",
        (ProviderKind::Paytr, false) => "https://api.paytr.com",
        (ProviderKind::Paynkolay, true) => "https://test.paynkolay.com/api",
        (ProviderKind::Paynkolay, false) => "https://api.paynkolay.com",
        (ProviderKind::Paybull, true) => "https://test-api.paybull.com",
        (ProviderKind::Paybull, false) => "https://api.paybull.com",
    }
}

/// Effective endpoint for a provider: explicit config wins, otherwise the
/// kind/mode default.
pub fn endpoint_for(provider: &Provider) -> String {
    provider
        .config
        .endpoint
        .clone()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| default_endpoint(provider.kind, provider.is_test_mode).to_string())
}

/// Opaque transaction identifier for test-mode synchronous completions.
pub(crate) fn test_transaction_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("TEST_{}", &id[..9])
}

/// Round to kuruş (two decimal places).
pub(crate) fn round_kurus(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build a fixed quote table from per-bank flat markup rates. Tier 1 always
/// carries a zero rate, so its total equals the amount exactly.
pub(crate) fn fixed_quote_table(
    amount: f64,
    banks: &[(&str, &[(u32, f64)])],
) -> Vec<BankInstallments> {
    banks
        .iter()
        .map(|(bank_name, tiers)| BankInstallments {
            bank_name: (*bank_name).to_string(),
            bank_logo: None,
            installments: tiers
                .iter()
                .map(|&(count, rate)| {
                    let total = round_kurus(amount * (1.0 + rate));
                    InstallmentOption {
                        count,
                        monthly_amount: round_kurus(total / count as f64),
                        total_amount: total,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Fetch and decode a bank installment table from a gateway endpoint.
pub(crate) async fn fetch_rate_table(
    http: &reqwest::Client,
    url: &str,
    body: serde_json::Value,
) -> Result<Vec<BankInstallments>, GatewayError> {
    let response = http
        .post(url)
        .json(&body)
        .send()
        .await
        .map_err(|err| GatewayError::upstream(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::upstream(format!(
            "installment rate request returned {status}: {body}"
        )));
    }

    response
        .json::<Vec<BankInstallments>>()
        .await
        .map_err(|err| GatewayError::upstream(format!("malformed rate response: {err}")))
}
