//! Domain action modules against a mock backend

use backoffice_core::{MemoryTokenStore, TokenPair};
use backoffice_frontend_common::store::AppStore;
use backoffice_http::{ApiClient, ClientError, Credentials};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup(tokens: Option<TokenPair>) -> (MockServer, AppStore) {
    let mock_server = MockServer::start().await;
    let store = Arc::new(match tokens {
        Some(pair) => MemoryTokenStore::with_pair(&pair),
        None => MemoryTokenStore::new(),
    });
    let client = ApiClient::builder()
        .base_url(format!("{}/api", mock_server.uri()))
        .token_store(store)
        .build()
        .unwrap();
    (mock_server, AppStore::new(client))
}

fn session() -> Option<TokenPair> {
    Some(TokenPair::new("a1", "r1"))
}

#[tokio::test]
async fn test_login_and_logout_update_user() {
    let (mock_server, mut app) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})),
        )
        .mount(&mock_server)
        .await;

    app.auth
        .login(&Credentials::new("admin", "secret"))
        .await
        .unwrap();
    assert!(app.auth.is_authenticated());
    assert_eq!(app.auth.state().user.as_deref(), Some("admin"));

    app.auth.logout().unwrap();
    assert!(!app.auth.is_authenticated());
    assert_eq!(app.auth.state().user, None);
}

#[tokio::test]
async fn test_failed_login_is_returned() {
    let (mock_server, mut app) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad"})))
        .mount(&mock_server)
        .await;

    let result = app.auth.login(&Credentials::new("admin", "nope")).await;
    assert!(matches!(result, Err(ClientError::Unauthorized(_))));
    assert_eq!(app.auth.state().user, None);
}

#[tokio::test]
async fn test_fetch_products_accepts_both_list_shapes() {
    let (mock_server, mut app) = setup(session()).await;

    Mock::given(method("GET"))
        .and(path("/api/shop/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "next": null, "previous": null,
            "results": [{"id": 1, "name": "Desk"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/shop/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
        .mount(&mock_server)
        .await;

    app.products.fetch_products().await;
    app.products.fetch_categories().await;

    let state = app.products.state();
    assert_eq!(state.products[0]["name"], "Desk");
    assert_eq!(state.categories.len(), 1);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_list() {
    let (mock_server, mut app) = setup(session()).await;

    Mock::given(method("GET"))
        .and(path("/api/admin-dashboard/invoices/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"number": "INV-1"}])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin-dashboard/invoices/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    app.invoices.fetch_invoices().await;
    assert_eq!(app.invoices.state().invoices.len(), 1);

    app.invoices.fetch_invoices().await;
    assert_eq!(app.invoices.state().invoices.len(), 1);
    assert!(!app.invoices.state().loading);
}

#[tokio::test]
async fn test_create_invoice_prepends() {
    let (mock_server, mut app) = setup(session()).await;

    Mock::given(method("GET"))
        .and(path("/api/admin-dashboard/invoices/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"number": "INV-1"}])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin-dashboard/invoices/"))
        .and(body_json(json!({"customer": 7})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": "INV-2"})))
        .mount(&mock_server)
        .await;

    app.invoices.fetch_invoices().await;
    let created = app
        .invoices
        .create_invoice(&json!({"customer": 7}))
        .await
        .unwrap();

    assert_eq!(created["number"], "INV-2");
    let numbers: Vec<_> = app
        .invoices
        .state()
        .invoices
        .iter()
        .map(|i| i["number"].clone())
        .collect();
    assert_eq!(numbers, vec![json!("INV-2"), json!("INV-1")]);
}

#[tokio::test]
async fn test_create_errors_propagate() {
    let (mock_server, mut app) = setup(session()).await;

    Mock::given(method("POST"))
        .and(path("/api/service/tickets/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "subject"})))
        .mount(&mock_server)
        .await;

    let result = app.service.create_ticket(&json!({})).await;
    assert!(matches!(result, Err(ClientError::BadRequest(_))));
    assert!(app.service.state().tickets.is_empty());
}

#[tokio::test]
async fn test_accounting_fetches_and_vat_generation() {
    let (mock_server, mut app) = setup(session()).await;

    Mock::given(method("GET"))
        .and(path("/api/admin-dashboard/entries/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin-dashboard/chart-of-accounts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"code": "4000"}]})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin-dashboard/vat-declarations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(
            "/api/admin-dashboard/vat-declarations/generate_declaration/",
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5})))
        .mount(&mock_server)
        .await;

    app.accounting.fetch_entries().await;
    app.accounting.fetch_chart_of_accounts().await;
    app.accounting.fetch_vat_declarations().await;
    app.accounting
        .generate_vat_declaration(&json!({"year": 2024, "quarter": 1}))
        .await
        .unwrap();

    let state = app.accounting.state();
    assert_eq!(state.entries.len(), 2);
    assert_eq!(state.chart_of_accounts[0]["code"], "4000");
    assert_eq!(state.vat_declarations, vec![json!({"id": 5})]);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_service_fetches() {
    let (mock_server, mut app) = setup(session()).await;

    Mock::given(method("GET"))
        .and(path("/api/service/appointments/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/service/tickets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2}])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/service/appointments/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .mount(&mock_server)
        .await;

    app.service.fetch_appointments().await;
    app.service.fetch_tickets().await;
    app.service.create_appointment(&json!({"service": 1})).await.unwrap();

    let state = app.service.state();
    assert_eq!(state.appointments, vec![json!({"id": 3}), json!({"id": 1})]);
    assert_eq!(state.tickets.len(), 1);
}
