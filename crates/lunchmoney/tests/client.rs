use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use lunchmoney::{
    Client, ClientError, ParsedAmount,
    types::{Crypto, ExternalId, TransactionFilters, UpdateCrypto, UpdateTransaction},
};

const CRYPTO_BODY: &str = r#"{
    "crypto": [
        {
            "zabo_account_id": 544,
            "source": "synced",
            "created_at": "2020-07-27T11:53:02.722Z",
            "name": "Dogecoin",
            "display_name": null,
            "balance": "1.902383849000000000",
            "balance_as_of": "2021-05-21T00:05:36.000Z",
            "currency": "doge",
            "status": "active",
            "institution_name": "MetaMask",
            "to_base": 0.25
        },
        {
            "id": 152,
            "source": "manual",
            "created_at": "2021-04-03T04:16:48.230Z",
            "name": "Ether",
            "display_name": "BlockFi - ETH",
            "balance": "5.391445130000000000",
            "balance_as_of": "2021-05-20T16:57:00.000Z",
            "currency": "ETH",
            "status": "active",
            "institution_name": "BlockFi",
            "to_base": 12000.50
        }
    ]
}"#;

const TRANSACTIONS_BODY: &str = r#"{
    "transactions": [
        {
            "id": 602,
            "date": "2020-01-01",
            "payee": "Starbucks",
            "amount": "4.5000",
            "currency": "cad",
            "notes": "Frappuccino",
            "category_id": null,
            "recurring_id": null,
            "asset_id": 153,
            "plaid_account_id": null,
            "status": "cleared",
            "is_group": false,
            "group_id": null,
            "parent_id": null,
            "external_id": null
        }
    ]
}"#;

async fn serve(router: Router) -> Client {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Client::builder()
        .token("test-token")
        .base_url(&format!("http://{addr}"))
        .build()
        .unwrap()
}

fn ts(value: &str) -> DateTime<Utc> {
    value.parse().unwrap()
}

fn crypto_route(status: StatusCode, body: &'static str) -> Router {
    Router::new().route("/v1/crypto", get(move || async move { (status, body) }))
}

#[tokio::test]
async fn list_crypto_decodes_synced_and_manual_assets() {
    let client = serve(crypto_route(StatusCode::OK, CRYPTO_BODY)).await;

    let crypto = client.list_crypto().await.unwrap();

    assert_eq!(
        crypto,
        vec![
            Crypto {
                id: None,
                zabo_account_id: Some(544),
                source: "synced".to_string(),
                name: "Dogecoin".to_string(),
                display_name: None,
                balance: "1.902383849000000000".to_string(),
                balance_as_of: ts("2021-05-21T00:05:36Z"),
                currency: "doge".to_string(),
                status: "active".to_string(),
                institution_name: Some("MetaMask".to_string()),
                created_at: ts("2020-07-27T11:53:02.722Z"),
                to_base: Some(0.25),
            },
            Crypto {
                id: Some(152),
                zabo_account_id: None,
                source: "manual".to_string(),
                name: "Ether".to_string(),
                display_name: Some("BlockFi - ETH".to_string()),
                balance: "5.391445130000000000".to_string(),
                balance_as_of: ts("2021-05-20T16:57:00Z"),
                currency: "ETH".to_string(),
                status: "active".to_string(),
                institution_name: Some("BlockFi".to_string()),
                created_at: ts("2021-04-03T04:16:48.230Z"),
                to_base: Some(12000.50),
            },
        ]
    );
}

#[tokio::test]
async fn list_crypto_empty_is_not_an_error() {
    let client = serve(crypto_route(StatusCode::OK, r#"{"crypto": []}"#)).await;

    let crypto = client.list_crypto().await.unwrap();
    assert!(crypto.is_empty());
}

#[tokio::test]
async fn list_crypto_invalid_json_is_a_decode_error() {
    let client = serve(crypto_route(StatusCode::OK, r#"{"invalid": "json""#)).await;

    let err = client.list_crypto().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }), "{err:?}");
    assert!(err.to_string().contains("decode response"), "{err}");
    assert!(err.to_string().starts_with("get crypto: "), "{err}");
}

#[tokio::test]
async fn list_crypto_unauthorized_names_the_operation() {
    let client = serve(crypto_route(
        StatusCode::UNAUTHORIZED,
        r#"{"error": "Unauthorized"}"#,
    ))
    .await;

    let err = client.list_crypto().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert!(err.to_string().contains("get crypto"), "{err}");
    assert!(err.to_string().contains("Unauthorized"), "{err}");
}

#[tokio::test]
async fn list_crypto_rejects_inconsistent_records() {
    let body = r#"{"crypto": [{
        "id": 1,
        "zabo_account_id": 2,
        "source": "manual",
        "created_at": "2021-04-03T04:16:48.230Z",
        "name": "Ether",
        "balance": "1",
        "balance_as_of": "2021-05-20T16:57:00.000Z",
        "currency": "ETH",
        "status": "active"
    }]}"#;
    let client = serve(crypto_route(StatusCode::OK, body)).await;

    let err = client.list_crypto().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse { .. }), "{err:?}");
    assert_eq!(
        err.validation().map(|v| v.field.as_str()),
        Some("crypto[0].zabo_account_id")
    );
}

#[tokio::test]
async fn update_manual_crypto_sends_only_present_fields() {
    let seen = Arc::new(Mutex::new(None));
    let router = Router::new().route(
        "/v1/crypto/manual/152",
        put({
            let seen = seen.clone();
            move |Json(body): Json<Value>| async move {
                *seen.lock().unwrap() = Some(body);
                (
                    StatusCode::OK,
                    r#"{
                        "id": 152,
                        "source": "manual",
                        "created_at": "2021-02-10T05:57:34.305Z",
                        "name": "Ethereum",
                        "display_name": "Updated ETH",
                        "balance": "10.000000000000000000",
                        "balance_as_of": "2021-05-20T16:57:00.000Z",
                        "currency": "ETH",
                        "status": "active",
                        "institution_name": null,
                        "to_base": 25000.0
                    }"#,
                )
            }
        }),
    );
    let client = serve(router).await;

    let update = UpdateCrypto {
        name: Some("Ethereum".to_string()),
        display_name: Some("Updated ETH".to_string()),
        balance: Some("10.0".to_string()),
        ..Default::default()
    };
    let crypto = client.update_manual_crypto(152, &update).await.unwrap();

    assert_eq!(
        seen.lock().unwrap().take(),
        Some(json!({
            "name": "Ethereum",
            "display_name": "Updated ETH",
            "balance": "10.0"
        }))
    );
    assert_eq!(crypto.id, Some(152));
    assert_eq!(crypto.institution_name, None);
    assert_eq!(crypto.to_base, Some(25000.0));
    assert_eq!(crypto.created_at, ts("2021-02-10T05:57:34.305Z"));
}

#[tokio::test]
async fn update_manual_crypto_errors_name_the_operation() {
    let router = Router::new()
        .route(
            "/v1/crypto/manual/152",
            put(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    r#"{"errors": ["currency is invalid for crypto: fakecoin"]}"#,
                )
            }),
        )
        .route(
            "/v1/crypto/manual/153",
            put(|| async { (StatusCode::OK, r#"{"invalid": "json""#) }),
        );
    let client = serve(router).await;
    let update = UpdateCrypto {
        name: Some("Bitcoin".to_string()),
        ..Default::default()
    };

    let err = client.update_manual_crypto(152, &update).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert!(err.to_string().contains("put crypto 152"), "{err}");

    let err = client.update_manual_crypto(153, &update).await.unwrap_err();
    assert!(err.to_string().contains("decode response"), "{err}");
}

#[tokio::test]
async fn list_transactions_sends_filters_and_token() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new().route(
        "/v1/transactions",
        get({
            let seen = seen.clone();
            move |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                let auth = headers
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                seen.lock().unwrap().push((auth, params));
                (StatusCode::OK, TRANSACTIONS_BODY)
            }
        }),
    );
    let client = serve(router).await;

    let filters = TransactionFilters {
        category_id: Some(7),
        start_date: Some("2020-01-01".to_string()),
        end_date: Some("2020-01-31".to_string()),
        debit_as_negative: Some(true),
        ..Default::default()
    };
    let transactions = client.list_transactions(Some(&filters)).await.unwrap();
    client.list_transactions(None).await.unwrap();

    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].id, 602);
    assert_eq!(transactions[0].asset_id, Some(153));
    assert_eq!(transactions[0].category_id, None);

    let seen = seen.lock().unwrap();
    let (auth, params) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-token"));
    assert_eq!(
        params,
        &HashMap::from([
            ("category_id".to_string(), "7".to_string()),
            ("start_date".to_string(), "2020-01-01".to_string()),
            ("end_date".to_string(), "2020-01-31".to_string()),
            ("debit_as_negative".to_string(), "true".to_string()),
        ])
    );
    assert!(seen[1].1.is_empty());
}

#[tokio::test]
async fn invalid_filters_never_reach_the_server() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/v1/transactions",
        get({
            let hits = hits.clone();
            move || async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::OK, TRANSACTIONS_BODY)
            }
        }),
    );
    let client = serve(router).await;

    let filters = TransactionFilters {
        start_date: Some("01/01/2020".to_string()),
        ..Default::default()
    };
    let err = client.list_transactions(Some(&filters)).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest { .. }), "{err:?}");
    assert!(err.to_string().starts_with("get transactions: "), "{err}");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn get_transaction_returns_single_record() {
    let router = Router::new().route(
        "/v1/transactions/602",
        get(|| async {
            (
                StatusCode::OK,
                r#"{
                    "id": 602,
                    "date": "2020-01-01",
                    "payee": "Starbucks",
                    "amount": "4.5000",
                    "currency": "cad",
                    "status": "cleared",
                    "is_group": false,
                    "parent_id": 600
                }"#,
            )
        }),
    );
    let client = serve(router).await;

    let tx = client.get_transaction(602, None).await.unwrap();
    assert_eq!(tx.payee, "Starbucks");
    assert_eq!(tx.parent_id, Some(600));
    assert_eq!(tx.notes, None);
}

#[tokio::test]
async fn get_transaction_rejects_malformed_server_date() {
    let router = Router::new().route(
        "/v1/transactions/9",
        get(|| async {
            (
                StatusCode::OK,
                r#"{"id": 9, "date": "01/02/2020", "payee": "x", "amount": "1",
                    "currency": "usd", "status": "cleared"}"#,
            )
        }),
    );
    let client = serve(router).await;

    let err = client.get_transaction(9, None).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse { .. }), "{err:?}");
    assert!(err.to_string().starts_with("get transaction 9: "), "{err}");
}

#[tokio::test]
async fn update_transaction_with_bad_date_fails_before_network() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/v1/transactions/7",
        put({
            let hits = hits.clone();
            move || async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::OK, r#"{"updated": true}"#)
            }
        }),
    );
    let client = serve(router).await;

    let update = UpdateTransaction {
        date: Some("02/10/2021".to_string()),
        ..Default::default()
    };
    let err = client.update_transaction(7, &update).await.unwrap_err();

    assert_eq!(err.validation().map(|v| v.field.as_str()), Some("date"));
    assert!(err.to_string().contains("update transaction 7"), "{err}");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_transaction_reports_split() {
    let seen = Arc::new(Mutex::new(None));
    let router = Router::new().route(
        "/v1/transactions/7",
        put({
            let seen = seen.clone();
            move |Json(body): Json<Value>| async move {
                *seen.lock().unwrap() = Some(body);
                (StatusCode::OK, r#"{"updated": true, "split": [8, 9]}"#)
            }
        }),
    );
    let client = serve(router).await;

    let update = UpdateTransaction {
        status: Some("cleared".to_string()),
        category_id: Some(0),
        ..Default::default()
    };
    let result = client.update_transaction(7, &update).await.unwrap();

    assert!(result.updated);
    assert_eq!(result.split, vec![8, 9]);
    assert_eq!(
        seen.lock().unwrap().take(),
        Some(json!({ "transaction": { "status": "cleared", "category_id": 0 } }))
    );
}

#[tokio::test]
async fn categories_error_field_is_surfaced() {
    let router = Router::new().route(
        "/v1/categories",
        get(|| async { (StatusCode::OK, r#"{"error": "Access token does not exist."}"#) }),
    );
    let client = serve(router).await;

    let err = client.list_categories().await.unwrap_err();
    assert!(matches!(err, ClientError::Api { .. }), "{err:?}");
    assert!(err.to_string().contains("Access token does not exist."), "{err}");
}

#[tokio::test]
async fn categories_and_single_category_decode() {
    let router = Router::new()
        .route(
            "/v1/categories",
            get(|| async {
                (
                    StatusCode::OK,
                    r#"{"categories": [{
                        "id": 83,
                        "name": "Test 1",
                        "description": "Test description",
                        "is_income": false,
                        "exclude_from_budget": true,
                        "exclude_from_totals": false,
                        "updated_at": "2020-01-28T09:49:03.225Z",
                        "created_at": "2020-01-28T09:49:03.225Z",
                        "is_group": false,
                        "group_id": null
                    }]}"#,
                )
            }),
        )
        .route(
            "/v1/categories/83",
            get(|| async { (StatusCode::OK, r#"{"id": 83, "name": "Test 1"}"#) }),
        );
    let client = serve(router).await;

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert!(categories[0].exclude_from_budget);
    assert_eq!(categories[0].group_id, None);

    let category = client.get_category(83).await.unwrap();
    assert_eq!(category.name, "Test 1");
    assert_eq!(category.updated_at, None);
}

#[tokio::test]
async fn tags_accept_a_bare_array() {
    let router = Router::new().route(
        "/v1/tags",
        get(|| async {
            (
                StatusCode::OK,
                r#"[{"id": 1, "name": "Trip", "description": null}, {"id": 2, "name": "Work"}]"#,
            )
        }),
    );
    let client = serve(router).await;

    let tags = client.list_tags().await.unwrap();
    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Trip", "Work"]);
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::builder()
        .token("test-token")
        .base_url(&format!("http://{addr}"))
        .build()
        .unwrap();

    let err = client.list_tags().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }), "{err:?}");
    assert_eq!(err.op(), Some("get tags"));
}

#[tokio::test]
async fn dropping_the_future_cancels_the_request() {
    let router = Router::new().route(
        "/v1/crypto",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            (StatusCode::OK, r#"{"crypto": []}"#)
        }),
    );
    let client = serve(router).await;

    let res = tokio::time::timeout(Duration::from_millis(100), client.list_crypto()).await;
    assert!(res.is_err());
}

#[tokio::test]
async fn every_fixture_record_converts_to_minor_units() {
    let router = Router::new()
        .route("/v1/crypto", get(|| async { CRYPTO_BODY }))
        .route("/v1/transactions", get(|| async { TRANSACTIONS_BODY }));
    let client = serve(router).await;

    let balances: Vec<String> = client
        .list_crypto()
        .await
        .unwrap()
        .iter()
        .map(|asset| asset.parsed_amount().unwrap().to_string())
        .collect();
    assert_eq!(balances, ["1.902383849 DOGE", "5.39144513 ETH"]);

    let transactions = client.list_transactions(None).await.unwrap();
    assert!(!transactions.is_empty());
    for tx in &transactions {
        let amount = tx.parsed_amount().unwrap();
        assert_eq!(amount.minor(), 450);
        assert_eq!(amount.to_string(), "4.50 CAD");
    }
}

#[tokio::test]
async fn numeric_external_id_decodes() {
    let body = TRANSACTIONS_BODY.replace(r#""external_id": null"#, r#""external_id": 9876"#);
    let router = Router::new().route(
        "/v1/transactions",
        get(move || {
            let body = body.clone();
            async move { body }
        }),
    );
    let client = serve(router).await;

    let transactions = client.list_transactions(None).await.unwrap();
    assert_eq!(transactions[0].external_id, Some(ExternalId::Number(9876)));
}

#[tokio::test]
async fn truncated_error_body_keeps_the_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(
                b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 64\r\nconnection: close\r\n\r\nbusy",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = Client::builder()
        .token("test-token")
        .base_url(&format!("http://{addr}"))
        .build()
        .unwrap();

    let err = client.list_tags().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { .. }), "{err:?}");
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(err.op(), Some("get tags"));
}
