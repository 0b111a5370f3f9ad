//! Provider configuration model
//!
//! Domain types for payment-provider configurations: the closed set of
//! supported gateway kinds, the credential block, and the create/update DTOs
//! accepted at the HTTP boundary.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// The closed set of supported payment gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Iyzico,
    Paytr,
    Paynkolay,
    Paybull,
}

impl ProviderKind {
    /// Wire name of the kind, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Iyzico => "iyzico",
            ProviderKind::Paytr => "paytr",
            ProviderKind::Paynkolay => "paynkolay",
            ProviderKind::Paybull => "paybull",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway credentials and endpoint overrides.
///
/// `endpoint` is optional; when absent the gateway derives it from the
/// provider kind and test-mode flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[schema(example = "sandbox-api-key")]
    pub api_key: String,
    #[schema(example = "sandbox-secret-key")]
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// A stored payment-provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Sequential identifier assigned by the store; never reused.
    pub id: u64,
    /// Display label shown in the admin UI.
    pub name: String,
    /// Gateway kind; immutable after creation.
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// At most one provider is active store-wide.
    pub is_active: bool,
    /// Sandbox endpoints and test-card enforcement when set.
    pub is_test_mode: bool,
    pub config: ProviderConfig,
    /// Ceiling on the installment count accepted by payment dispatch.
    pub max_installments: u32,
}

/// Request body for `POST /providers`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDraft {
    #[schema(example = "iyzico sandbox")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default = "default_test_mode")]
    pub is_test_mode: bool,
    pub config: ProviderConfig,
    #[serde(default = "default_max_installments")]
    #[schema(example = 6)]
    pub max_installments: u32,
}

/// Partial update body for `PATCH /providers/{id}`.
///
/// The gateway kind is immutable, so there is no `type` field here. A
/// supplied `config` replaces the stored one wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_test_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_installments: Option<u32>,
}

fn default_test_mode() -> bool {
    true
}

fn default_max_installments() -> u32 {
    12
}

/// Collects per-field validation failures for the boundary error payload.
fn check_config(config: &ProviderConfig, errors: &mut Vec<serde_json::Value>) {
    if config.api_key.trim().is_empty() {
        errors.push(json!({
            "field": "config.apiKey",
            "message": "apiKey is required and cannot be empty"
        }));
    }
    if config.secret_key.trim().is_empty() {
        errors.push(json!({
            "field": "config.secretKey",
            "message": "secretKey is required and cannot be empty"
        }));
    }
}

impl ProviderDraft {
    /// Validates the draft, returning per-field errors for the 400 payload.
    pub fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(json!({
                "field": "name",
                "message": "name is required and cannot be empty"
            }));
        }
        check_config(&self.config, &mut errors);
        if self.max_installments == 0 {
            errors.push(json!({
                "field": "maxInstallments",
                "message": "maxInstallments must be at least 1"
            }));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl ProviderUpdate {
    /// Validates the supplied fields only; absent fields are not checked.
    pub fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            errors.push(json!({
                "field": "name",
                "message": "name cannot be empty"
            }));
        }
        if let Some(config) = &self.config {
            check_config(config, &mut errors);
        }
        if self.max_installments == Some(0) {
            errors.push(json!({
                "field": "maxInstallments",
                "message": "maxInstallments must be at least 1"
            }));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// True when no field is supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.is_active.is_none()
            && self.is_test_mode.is_none()
            && self.config.is_none()
            && self.max_installments.is_none()
    }
}
