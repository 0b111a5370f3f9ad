//! Integration tests driving the HTTP surface end to end.

use anyhow::{Context, Result as AnyhowResult};
use payadmin::server::{AppState, create_app};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

struct TestServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<AnyhowResult<()>>>,
}

impl TestServerHandle {
    async fn shutdown(mut self) -> AnyhowResult<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.join_handle.take() {
            handle.await.context("server task join failed")??;
        }
        Ok(())
    }
}

impl Drop for TestServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Spawns the app on an ephemeral port and returns its base URL.
async fn spawn_test_app() -> (String, TestServerHandle) {
    let app = create_app(AppState::new());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .context("server error")
    });

    (
        format!("http://{addr}"),
        TestServerHandle {
            shutdown_tx: Some(shutdown_tx),
            join_handle: Some(join_handle),
        },
    )
}

fn iyzico_draft(name: &str, active: bool) -> Value {
    json!({
        "name": name,
        "type": "iyzico",
        "isActive": active,
        "isTestMode": true,
        "config": {"apiKey": "k", "secretKey": "s"},
        "maxInstallments": 6
    })
}

#[tokio::test]
async fn test_root_reports_service_info() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{base}/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["service"], "payadmin");
    assert!(body["version"].is_string());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_provider_crud_lifecycle() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    // Empty list to begin with.
    let list: Vec<Value> = client
        .get(format!("{base}/providers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());

    // Create.
    let response = client
        .post(format!("{base}/providers"))
        .json(&iyzico_draft("iyzico sandbox", false))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["id"], 1);
    assert_eq!(created["type"], "iyzico");
    assert_eq!(created["isActive"], false);
    assert_eq!(created["maxInstallments"], 6);

    // Patch name and activation.
    let response = client
        .patch(format!("{base}/providers/1"))
        .json(&json!({"name": "renamed", "isActive": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["name"], "renamed");
    assert_eq!(updated["isActive"], true);

    // Delete is 204, even when repeated.
    for _ in 0..2 {
        let response = client
            .delete(format!("{base}/providers/1"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let list: Vec<Value> = client
        .get(format!("{base}/providers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_activation_invariant_over_http() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/providers"))
        .json(&iyzico_draft("first", true))
        .send()
        .await
        .unwrap();
    let second: Value = client
        .post(format!("{base}/providers"))
        .json(&json!({
            "name": "second",
            "type": "paytr",
            "isActive": true,
            "config": {"apiKey": "k2", "secretKey": "s2"}
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["isActive"], true);

    let list: Vec<Value> = client
        .get(format!("{base}/providers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let active: Vec<&Value> = list.iter().filter(|p| p["isActive"] == true).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "second");
    // The deactivated provider is otherwise untouched.
    assert_eq!(list[0]["name"], "first");
    assert_eq!(list[0]["maxInstallments"], 6);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_create_validation_failure_lists_fields() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/providers"))
        .json(&json!({
            "name": "",
            "type": "iyzico",
            "config": {"apiKey": "", "secretKey": "s"}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"],
        "application/problem+json"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["traceId"].is_string() || body["trace_id"].is_string());
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "config.apiKey"]);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_patch_unknown_provider_is_404() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    let response = client
        .patch(format!("{base}/providers/99"))
        .json(&json!({"name": "ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_malformed_json_body_is_400() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/providers"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_FAILED");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_checkout_flow_end_to_end() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    // Configure an active iyzico sandbox provider.
    let response = client
        .post(format!("{base}/providers"))
        .json(&iyzico_draft("iyzico sandbox", true))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Quote installments for the cart total.
    let response = client
        .get(format!("{base}/payment/installments?amount=9600"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let banks: Vec<Value> = response.json().await.unwrap();
    assert!(!banks.is_empty());
    for bank in &banks {
        let first = &bank["installments"][0];
        assert_eq!(first["count"], 1);
        assert_eq!(first["totalAmount"], 9600.0);
    }

    // Pay with the provider's canonical test card.
    let response = client
        .post(format!("{base}/payment/process"))
        .json(&json!({
            "amount": 9600.0,
            "currency": "TRY",
            "installment": 3,
            "cardDetails": {
                "number": "5528790000000008",
                "expiryMonth": "12",
                "expiryYear": "2030",
                "cvv": "123",
                "holderName": "Ayşe Yılmaz"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["status"], "success");
    assert_eq!(outcome["provider"], "iyzico");
    assert!(
        outcome["transactionId"]
            .as_str()
            .unwrap()
            .starts_with("TEST_")
    );

    // The attempt shows up in payment history.
    let records: Vec<Value> = client
        .get(format!("{base}/payments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "success");
    assert_eq!(records[0]["installment"], 3);
    assert_eq!(records[0]["providerId"], 1);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_process_without_active_provider_is_400() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/payment/process"))
        .json(&json!({
            "amount": 100.0,
            "currency": "TRY",
            "installment": 1,
            "cardDetails": {
                "number": "5528790000000008",
                "expiryMonth": "12",
                "expiryYear": "2030",
                "cvv": "123",
                "holderName": "Test"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NO_ACTIVE_PROVIDER");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_wrong_test_card_mentions_expected_number() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/providers"))
        .json(&iyzico_draft("iyzico sandbox", true))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{base}/payment/process"))
        .json(&json!({
            "amount": 100.0,
            "currency": "TRY",
            "installment": 1,
            "cardDetails": {
                "number": "4111111111111111",
                "expiryMonth": "12",
                "expiryYear": "2030",
                "cvv": "123",
                "holderName": "Test"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_TEST_CARD");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("5528790000000008")
    );

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_amount_is_400() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/providers"))
        .json(&iyzico_draft("iyzico sandbox", true))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("{base}/payment/installments?amount=-5"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_AMOUNT");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_redirect_gateway_over_http() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/providers"))
        .json(&json!({
            "name": "paytr sandbox",
            "type": "paytr",
            "isActive": true,
            "config": {"apiKey": "merchant-key", "secretKey": "s3cret", "merchantId": "m-42"}
        }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{base}/payment/process"))
        .json(&json!({
            "amount": 250.0,
            "currency": "TRY",
            "installment": 6,
            "cardDetails": {
                "number": "4355084355084358",
                "expiryMonth": "12",
                "expiryYear": "2030",
                "cvv": "000",
                "holderName": "Test"
            },
            "returnUrl": "https://shop.example/done"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["status"], "redirect");
    assert_eq!(outcome["provider"], "paytr");
    assert_eq!(outcome["installment"], 6);
    let url = outcome["redirectUrl"].as_str().unwrap();
    assert!(url.starts_with("https://test-api.paytr.com/"));
    assert!(url.contains("installment=6"));

    // Redirects are recorded as pending.
    let records: Vec<Value> = client
        .get(format!("{base}/payments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(records[0]["status"], "pending");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc: Value = response.json().await.unwrap();
    assert!(doc["paths"]["/providers"].is_object());
    assert!(doc["paths"]["/payment/process"].is_object());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_error_responses_carry_trace_header() {
    let (base, server) = spawn_test_app().await;
    let client = reqwest::Client::new();

    let response = client
        .patch(format!("{base}/providers/7"))
        .json(&json!({"name": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let trace = response.headers().get("x-trace-id").unwrap();
    assert!(trace.to_str().unwrap().starts_with("req-"));

    server.shutdown().await.unwrap();
}
