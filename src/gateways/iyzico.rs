//! iyzico gateway
//!
//! Synchronous-flow gateway: payments complete in-band with a transaction
//! id. Production requests carry a SHA-256 digest over
//! `merchantId|amount|secretKey`.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::gateways::{
    Gateway, GatewayError, endpoint_for, fetch_rate_table, fixed_quote_table, test_transaction_id,
};
use crate::models::{BankInstallments, PaymentOutcome, PaymentRequest, Provider, ProviderKind};

const TEST_RATES: &[(&str, &[(u32, f64)])] = &[
    ("Bonus", &[(1, 0.0), (3, 0.035), (6, 0.07)]),
    ("World", &[(1, 0.0), (3, 0.04), (6, 0.08)]),
];

pub struct Iyzico;

fn sign(provider: &Provider, amount: f64) -> String {
    let merchant = provider.config.merchant_id.as_deref().unwrap_or_default();
    let payload = format!("{}|{}|{}", merchant, amount, provider.config.secret_key);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    status: String,
    #[serde(rename = "transactionId")]
    transaction_id: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

#[async_trait]
impl Gateway for Iyzico {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Iyzico
    }

    async fn installment_rates(
        &self,
        provider: &Provider,
        amount: f64,
        http: &reqwest::Client,
    ) -> Result<Vec<BankInstallments>, GatewayError> {
        if provider.is_test_mode {
            return Ok(fixed_quote_table(amount, TEST_RATES));
        }

        let url = format!("{}/payment/iyzipos/installments", endpoint_for(provider));
        let body = serde_json::json!({
            "apiKey": provider.config.api_key,
            "amount": amount,
            "hash": sign(provider, amount),
        });
        fetch_rate_table(http, &url, body).await
    }

    async fn charge(
        &self,
        provider: &Provider,
        request: &PaymentRequest,
        http: &reqwest::Client,
    ) -> Result<PaymentOutcome, GatewayError> {
        if provider.is_test_mode {
            return Ok(PaymentOutcome::Success {
                provider: ProviderKind::Iyzico,
                transaction_id: test_transaction_id(),
                amount: request.amount,
                currency: request.currency.clone(),
            });
        }

        let url = format!("{}/payment/auth", endpoint_for(provider));
        let body = serde_json::json!({
            "apiKey": provider.config.api_key,
            "amount": request.amount,
            "currency": request.currency,
            "installment": request.installment,
            "hash": sign(provider, request.amount),
        });
        let response = http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| GatewayError::upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::upstream(format!(
                "payment request returned {status}: {body}"
            )));
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::upstream(format!("malformed auth response: {err}")))?;
        match (auth.status.as_str(), auth.transaction_id) {
            ("success", Some(transaction_id)) => Ok(PaymentOutcome::Success {
                provider: ProviderKind::Iyzico,
                transaction_id,
                amount: request.amount,
                currency: request.currency.clone(),
            }),
            _ => Err(GatewayError::declined(
                auth.error_message
                    .unwrap_or_else(|| "payment declined".to_string()),
            )),
        }
    }
}
