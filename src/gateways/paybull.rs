//! Paybull gateway
//!
//! Synchronous-flow gateway. Signs requests with a SHA-256 digest over the
//! undelimited concatenation `apiKey` + amount + `secretKey`.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::gateways::{
    Gateway, GatewayError, endpoint_for, fetch_rate_table, fixed_quote_table, test_transaction_id,
};
use crate::models::{BankInstallments, PaymentOutcome, PaymentRequest, Provider, ProviderKind};

const TEST_RATES: &[(&str, &[(u32, f64)])] = &[
    ("Bonus", &[(1, 0.0), (3, 0.03), (6, 0.06)]),
    ("Paraf", &[(1, 0.0), (3, 0.035), (6, 0.065)]),
];

pub struct Paybull;

fn sign(provider: &Provider, amount: f64) -> String {
    let payload = format!(
        "{}{}{}",
        provider.config.api_key, amount, provider.config.secret_key
    );
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[derive(Debug, Deserialize)]
struct PayResponse {
    status: String,
    #[serde(rename = "transactionId")]
    transaction_id: Option<String>,
    #[serde(rename = "message")]
    message: Option<String>,
}

#[async_trait]
impl Gateway for Paybull {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Paybull
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

        let url = format!("{}/installment-options", endpoint_for(provider));
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
                provider: ProviderKind::Paybull,
                transaction_id: test_transaction_id(),
                amount: request.amount,
                currency: request.currency.clone(),
            });
        }

        let url = format!("{}/pay", endpoint_for(provider));
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

        let pay: PayResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::upstream(format!("malformed pay response: {err}")))?;
        match (pay.status.as_str(), pay.transaction_id) {
            ("success", Some(transaction_id)) => Ok(PaymentOutcome::Success {
                provider: ProviderKind::Paybull,
                transaction_id,
                amount: request.amount,
                currency: request.currency.clone(),
            }),
            _ => Err(GatewayError::declined(
                pay.message.unwrap_or_else(|| "payment declined".to_string()),
            )),
        }
    }
}
