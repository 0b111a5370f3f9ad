//! # Provider API Handlers
//!
//! Handlers for the provider configuration CRUD endpoints.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, validation_error};
use crate::models::{Provider, ProviderDraft, ProviderUpdate};
use crate::server::AppState;

/// List all configured providers
#[utoipa::path(
    get,
    path = "/providers",
    responses(
        (status = 200, description = "List of configured providers", body = Vec<Provider>)
    ),
    tag = "providers"
)]
pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<Provider>> {
    Json(state.providers.list())
}

/// Create a new provider configuration
#[utoipa::path(
    post,
    path = "/providers",
    request_body = ProviderDraft,
    responses(
        (status = 201, description = "Provider created", body = Provider),
        (status = 400, description = "Validation error", body = ApiError)
    ),
    tag = "providers"
)]
pub async fn create_provider(
    State(state): State<AppState>,
    draft: Result<Json<ProviderDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Provider>), ApiError> {
    let Json(draft) = draft?;
    if let Err(fields) = draft.validate() {
        return Err(validation_error("Validation failed", json!(fields)));
    }

    let provider = state.providers.create(draft);
    info!(
        id = provider.id,
        kind = %provider.kind,
        active = provider.is_active,
        "provider created"
    );
    Ok((StatusCode::CREATED, Json(provider)))
}

/// Partially update a provider configuration
#[utoipa::path(
    patch,
    path = "/providers/{id}",
    params(
        ("id" = u64, Path, description = "Provider identifier")
    ),
    request_body = ProviderUpdate,
    responses(
        (status = 200, description = "Updated provider", body = Provider),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "Provider not found", body = ApiError)
    ),
    tag = "providers"
)]
pub async fn update_provider(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    update: Result<Json<ProviderUpdate>, JsonRejection>,
) -> Result<Json<Provider>, ApiError> {
    let Json(update) = update?;
    if let Err(fields) = update.validate() {
        return Err(validation_error("Validation failed", json!(fields)));
    }

    let provider = state.providers.update(id, update)?;
    info!(id, active = provider.is_active, "provider updated");
    Ok(Json(provider))
}

/// Delete a provider configuration
#[utoipa::path(
    delete,
    path = "/providers/{id}",
    params(
        ("id" = u64, Path, description = "Provider identifier")
    ),
    responses(
        (status = 204, description = "Provider deleted (or did not exist)")
    ),
    tag = "providers"
)]
pub async fn delete_provider(State(state): State<AppState>, Path(id): Path<u64>) -> StatusCode {
    state.providers.delete(id);
    info!(id, "provider deleted");
    StatusCode::NO_CONTENT
}
