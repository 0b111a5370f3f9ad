//! # Payment API Handlers
//!
//! Handlers for installment quoting, payment processing, and payment history.

use axum::{
    extract::{Query, State, rejection::JsonRejection},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::{BankInstallments, PaymentOutcome, PaymentRecord, PaymentRequest};
use crate::server::AppState;

/// Query parameters for installment quotes
#[derive(Debug, Deserialize, IntoParams)]
pub struct InstallmentsQuery {
    /// Purchase amount to quote installments for
    pub amount: f64,
}

/// Quote per-bank installment options for an amount
#[utoipa::path(
    get,
    path = "/payment/installments",
    params(InstallmentsQuery),
    responses(
        (status = 200, description = "Installment options grouped by bank", body = Vec<BankInstallments>),
        (status = 400, description = "Invalid amount or no active provider", body = ApiError)
    ),
    tag = "payments"
)]
pub async fn installments(
    State(state): State<AppState>,
    Query(query): Query<InstallmentsQuery>,
) -> Result<Json<Vec<BankInstallments>>, ApiError> {
    let banks = state.payments.compute_installments(query.amount).await?;
    Ok(Json(banks))
}

/// Process a payment through the active provider
#[utoipa::path(
    post,
    path = "/payment/process",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Payment completed or redirect issued", body = PaymentOutcome),
        (status = 400, description = "Payment rejected", body = ApiError)
    ),
    tag = "payments"
)]
pub async fn process(
    State(state): State<AppState>,
    request: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentOutcome>, ApiError> {
    let Json(request) = request?;
    let outcome = state.payments.process_payment(&request).await?;
    Ok(Json(outcome))
}

/// List recorded payment attempts
#[utoipa::path(
    get,
    path = "/payments",
    responses(
        (status = 200, description = "Payment attempts in chronological order", body = Vec<PaymentRecord>)
    ),
    tag = "payments"
)]
pub async fn list_payments(State(state): State<AppState>) -> Json<Vec<PaymentRecord>> {
    Json(state.payments.payment_history())
}
