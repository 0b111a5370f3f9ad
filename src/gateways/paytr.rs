//! PayTR gateway
//!
//! Redirect-flow gateway: `charge` issues a hosted-page URL instead of an
//! in-band result. Requests are signed with an HMAC-SHA256 token over
//! `merchantId` + amount + installment, keyed by the secret key.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::gateways::{Gateway, GatewayError, endpoint_for, fetch_rate_table, fixed_quote_table};
use crate::models::{BankInstallments, PaymentOutcome, PaymentRequest, Provider, ProviderKind};

const TEST_RATES: &[(&str, &[(u32, f64)])] = &[
    ("Maximum", &[(1, 0.0), (3, 0.04), (6, 0.08)]),
    ("World", &[(1, 0.0), (3, 0.045), (6, 0.09)]),
];

pub struct Paytr;

fn token(provider: &Provider, amount: f64, installment: u32) -> Result<String, GatewayError> {
    let merchant = provider.config.merchant_id.as_deref().unwrap_or_default();
    let mut mac = Hmac::<Sha256>::new_from_slice(provider.config.secret_key.as_bytes())
        .map_err(|err| GatewayError::upstream(format!("invalid signing key: {err}")))?;
    mac.update(format!("{merchant}{amount}{installment}").as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl Gateway for Paytr {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Paytr
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

        let url = format!("{}/odeme/api/taksit-oranlari", endpoint_for(provider));
        let body = serde_json::json!({
            "merchant_id": provider.config.merchant_id,
            "amount": amount,
            "paytr_token": token(provider, amount, 0)?,
        });
        fetch_rate_table(http, &url, body).await
    }

    async fn charge(
        &self,
        provider: &Provider,
        request: &PaymentRequest,
        _http: &reqwest::Client,
    ) -> Result<PaymentOutcome, GatewayError> {
        let token = token(provider, request.amount, request.installment)?;
        let base = format!("{}/odeme/guvenli/{token}", endpoint_for(provider));
        let mut url = Url::parse(&base)
            .map_err(|err| GatewayError::upstream(format!("invalid endpoint: {err}")))?;
        url.query_pairs_mut()
            .append_pair("merchant", provider.config.api_key.as_str())
            .append_pair("amount", &request.amount.to_string())
            .append_pair("installment", &request.installment.to_string());
        if let Some(return_url) = &request.return_url {
            url.query_pairs_mut().append_pair("return_url", return_url);
        }

        Ok(PaymentOutcome::Redirect {
            provider: ProviderKind::Paytr,
            redirect_url: url.into(),
            installment: request.installment,
        })
    }
}
