//! Paynkolay gateway
//!
//! Redirect-flow gateway. Signs requests with a SHA-256 digest over
//! `secretKey|merchantId|amount` (note the order differs from iyzico).

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use url::Url;

use crate::gateways::{Gateway, GatewayError, endpoint_for, fetch_rate_table, fixed_quote_table};
use crate::models::{BankInstallments, PaymentOutcome, PaymentRequest, Provider, ProviderKind};

const TEST_RATES: &[(&str, &[(u32, f64)])] =
    &[("Axess", &[(1, 0.0), (3, 0.045), (6, 0.09)])];

pub struct Paynkolay;

fn sign(provider: &Provider, amount: f64) -> String {
    let merchant = provider.config.merchant_id.as_deref().unwrap_or_default();
    let payload = format!("{}|{}|{}", provider.config.secret_key, merchant, amount);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[async_trait]
impl Gateway for Paynkolay {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Paynkolay
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

        let url = format!("{}/installments", endpoint_for(provider));
        let body = serde_json::json!({
            "merchantId": provider.config.merchant_id,
            "amount": amount,
            "signature": sign(provider, amount),
        });
        fetch_rate_table(http, &url, body).await
    }

    async fn charge(
        &self,
        provider: &Provider,
        request: &PaymentRequest,
        _http: &reqwest::Client,
    ) -> Result<PaymentOutcome, GatewayError> {
        let base = format!("{}/checkout", endpoint_for(provider));
        let mut url = Url::parse(&base)
            .map_err(|err| GatewayError::upstream(format!("invalid endpoint: {err}")))?;
        url.query_pairs_mut()
            .append_pair("apiKey", provider.config.api_key.as_str())
            .append_pair("amount", &request.amount.to_string())
            .append_pair("installment", &request.installment.to_string())
            .append_pair("signature", &sign(provider, request.amount));
        if let Some(return_url) = &request.return_url {
            url.query_pairs_mut().append_pair("successUrl", return_url);
        }

        Ok(PaymentOutcome::Redirect {
            provider: ProviderKind::Paynkolay,
            redirect_url: url.into(),
            installment: request.installment,
        })
    }
}
