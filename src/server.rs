//! # Server Configuration
//!
//! This module contains the server setup and configuration for the payment admin API.

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::dispatch::PaymentService;
use crate::handlers;
use crate::store::{PaymentRecordStore, ProviderStore};
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub providers: ProviderStore,
    pub payments: PaymentService,
}

impl AppState {
    pub fn new() -> Self {
        let providers = ProviderStore::new();
        let records = PaymentRecordStore::new();
        let payments = PaymentService::new(providers.clone(), records);
        Self {
            providers,
            payments,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Attaches a fresh trace ID to the task for the duration of the request and
/// echoes it back in the `x-trace-id` response header.
async fn trace_context_middleware(request: Request, next: Next) -> Response {
    let trace_id = format!("req-{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);
    let context = TraceContext {
        trace_id: trace_id.clone(),
    };

    let mut response = telemetry::with_trace_context(context, next.run(request)).await;
    if let Ok(value) = trace_id.parse() {
        response.headers_mut().insert("x-trace-id", value);
    }
    response
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/providers",
            get(handlers::providers::list_providers).post(handlers::providers::create_provider),
        )
        .route(
            "/providers/{id}",
            axum::routing::patch(handlers::providers::update_provider)
                .delete(handlers::providers::delete_provider),
        )
        .route("/payment/installments", get(handlers::payments::installments))
        .route("/payment/process", post(handlers::payments::process))
        .route("/payments", get(handlers::payments::list_payments))
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new();
    let app = create_app(state);

    // Resolve the configured bind address
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, profile = %config.profile, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::providers::list_providers,
        crate::handlers::providers::create_provider,
        crate::handlers::providers::update_provider,
        crate::handlers::providers::delete_provider,
        crate::handlers::payments::installments,
        crate::handlers::payments::process,
        crate::handlers::payments::list_payments,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::Provider,
            crate::models::ProviderKind,
            crate::models::ProviderConfig,
            crate::models::ProviderDraft,
            crate::models::ProviderUpdate,
            crate::models::PaymentRequest,
            crate::models::CardDetails,
            crate::models::PaymentOutcome,
            crate::models::BankInstallments,
            crate::models::InstallmentOption,
            crate::models::PaymentRecord,
            crate::models::PaymentStatus,
            crate::error::ApiError,
        )
    ),
    info(
        title = "Payment Admin API",
        description = "API for managing payment provider configurations and checkout flows",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
