//! End-to-end tests over the HTTP surface.
//!
//! Each test boots the router on an ephemeral port with in-memory wiring and
//! drives it with a real HTTP client.

use std::sync::Arc;

use serde_json::{json, Value};

use bankledger_api::app::{build_app, services::AppServices};

async fn spawn_app() -> String {
    let services = Arc::new(AppServices::in_memory());
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let base = spawn_app().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn balance_of_unknown_user_is_zero() {
    let base = spawn_app().await;

    let resp = reqwest::get(format!("{base}/42/balance")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({"amount": "0"}));
}

#[tokio::test]
async fn deposit_is_accepted_and_reflected_in_the_balance() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/1/deposit"))
        .json(&json!({"amount": "10.00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 202);

    let resp = reqwest::get(format!("{base}/1/balance")).await.unwrap();
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({"amount": "10.00"})
    );
}

#[tokio::test]
async fn withdraw_beyond_balance_is_a_client_error_with_a_reason() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/1/withdraw"))
        .json(&json!({"amount": "0.01"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body = resp.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "insufficient balance");

    // Nothing was appended.
    let statement = reqwest::get(format!("{base}/1/statement"))
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(statement, json!([]));
}

#[tokio::test]
async fn zero_and_overscaled_amounts_are_rejected() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/1/deposit"))
        .json(&json!({"amount": "0"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(
        resp.json::<Value>().await.unwrap()["message"],
        "zero amount"
    );

    let resp = client
        .post(format!("{base}/1/deposit"))
        .json(&json!({"amount": "0.005"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(
        resp.json::<Value>().await.unwrap()["message"],
        "scale exceeded"
    );
}

#[tokio::test]
async fn malformed_user_id_fails_before_the_ledger_is_invoked() {
    let base = spawn_app().await;

    let resp = reqwest::get(format!("{base}/abc/balance")).await.unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.json::<Value>().await.unwrap()["error"], "invalid_user_id");
}

#[tokio::test]
async fn malformed_json_body_is_not_acceptable() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/1/deposit"))
        .header("content-type", "application/json")
        .body("{\"amount\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 406);
    assert_eq!(resp.json::<Value>().await.unwrap()["error"], "decode_error");
}

#[tokio::test]
async fn transfer_writes_one_statement_entry_on_each_side() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/1/deposit"))
        .json(&json!({"amount": "50.00"}))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{base}/1/transfer"))
        .json(&json!({"userId": 2, "amount": "20.00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 202);

    let origin: Vec<Value> = reqwest::get(format!("{base}/1/statement"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let destination: Vec<Value> = reqwest::get(format!("{base}/2/statement"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(origin.len(), 2);
    assert_eq!(destination.len(), 1);
    assert_eq!(origin[1]["operationType"], "TRANSFER_OUT");
    assert_eq!(origin[1]["amount"], "20.00");
    assert_eq!(destination[0]["operationType"], "TRANSFER_IN");
    assert_eq!(destination[0]["amount"], "20.00");
    assert!(destination[0]["date"].is_string());

    let origin_balance = reqwest::get(format!("{base}/1/balance"))
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    let destination_balance = reqwest::get(format!("{base}/2/balance"))
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(origin_balance, json!({"amount": "30.00"}));
    assert_eq!(destination_balance, json!({"amount": "20.00"}));
}

#[tokio::test]
async fn deposits_withdrawal_and_incoming_transfer_settle_to_the_exact_sum() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    for (path, body) in [
        ("/1/deposit", json!({"amount": "10.00"})),
        ("/1/withdraw", json!({"amount": "3.00"})),
        ("/1/deposit", json!({"amount": "0.02"})),
        ("/2/deposit", json!({"amount": "5.00"})),
        ("/2/transfer", json!({"userId": 1, "amount": "2.20"})),
    ] {
        let resp = client
            .post(format!("{base}{path}"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 202, "unexpected status for {path}");
    }

    let statement: Vec<Value> = reqwest::get(format!("{base}/1/statement"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(statement.len(), 4);
    assert_eq!(
        statement
            .iter()
            .map(|e| e["operationType"].as_str().unwrap().to_string())
            .collect::<Vec<_>>(),
        vec!["DEPOSIT", "WITHDRAW", "DEPOSIT", "TRANSFER_IN"]
    );

    let balance = reqwest::get(format!("{base}/1/balance"))
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(balance, json!({"amount": "9.22"}));
}
