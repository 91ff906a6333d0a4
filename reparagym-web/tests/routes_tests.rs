//! Full router against a mock commerce backend.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use httpmock::MockServer;
use reparagym_client::StoreConfig;
use reparagym_query::QueryConfig;
use reparagym_test_utils::fixtures;
use reparagym_web::{build_state, create_router, CatalogCache, WebConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(server: &MockServer, query: QueryConfig) -> (Router, CatalogCache) {
    let config = WebConfig {
        store: StoreConfig::new(server.base_url()),
        query,
        public_base_url: "https://reparagymstore.com".to_string(),
        ..WebConfig::default()
    };
    let state = build_state(&config, config.site(2026)).expect("state");
    let cache = state.cache.clone();
    (create_router(state, &config), cache)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

// ============================================================================
// PAGES
// ============================================================================

#[tokio::test]
async fn home_page_renders() {
    let server = MockServer::start_async().await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<link rel=\"canonical\" href=\"https://reparagymstore.com/\">"));
    assert!(html.contains("&copy; 2026 ReparagymStore"));
}

#[tokio::test]
async fn unknown_path_renders_not_found_page() {
    let server = MockServer::start_async().await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = get(&app, "/no-existe").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Página no encontrada"));
}

// ============================================================================
// CATALOG
// ============================================================================

#[tokio::test]
async fn catalog_lists_products_and_reuses_cached_listing() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/store/products")
                .query_param("category_id[]", "cardio")
                .query_param("offset", "0");
            then.status(200).json_body(fixtures::cardio_page_json());
        })
        .await;
    let (app, cache) = app(&server, fixtures::default_config());

    let first = get(&app, "/productos/cardio").await;
    assert_eq!(first.status(), StatusCode::OK);
    let html = body_text(first).await;
    assert!(html.contains("Banda para caminadora"));
    assert!(html.contains("Motor DC 2.5 HP"));
    assert!(html.contains("$1,250 MXN"));

    let second = get(&app, "/productos/cardio").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(body_text(second).await.contains("Banda para caminadora"));

    assert_eq!(mock.hits_async().await, 1);
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn catalog_page_parameter_sets_offset() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/store/products")
                .query_param("category_id[]", "fuerza")
                .query_param("limit", "12")
                .query_param("offset", "24");
            then.status(200)
                .json_body(fixtures::product_page_json(vec![], 24, 12));
        })
        .await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = get(&app, "/productos/fuerza?page=3").await;
    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_category_never_reaches_the_store() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path("/store/products");
            then.status(200).json_body(fixtures::cardio_page_json());
        })
        .await;
    let (app, cache) = app(&server, fixtures::default_config());

    let response = get(&app, "/productos/bicicletas").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(mock.hits_async().await, 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn catalog_server_error_exhausts_retries_then_shows_notice() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET").path("/store/products");
            then.status(503).body("upstream unavailable");
        })
        .await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = get(&app, "/productos/cables").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(response).await.contains("role=\"alert\""));
    assert_eq!(mock.hits_async().await, 4);
}

#[tokio::test]
async fn catalog_upstream_not_found_fails_fast() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET").path("/store/products");
            then.status(404)
                .json_body(fixtures::error_json("not_found", "Category not found"));
        })
        .await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = get(&app, "/productos/electronicos").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(mock.hits_async().await, 1);
}

// ============================================================================
// WHATSAPP & CONTACT
// ============================================================================

#[tokio::test]
async fn whatsapp_redirects_with_message() {
    let server = MockServer::start_async().await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = get(&app, "/whatsapp?mensaje=Necesito%20una%20banda").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://wa.me/525598765432?text=Necesito%20una%20banda"
    );
}

#[tokio::test]
async fn contact_form_is_forwarded_once() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("POST").path("/store/contact").json_body(json!({
                "name": "Jorge",
                "email": "jorge@fitzone.mx",
                "message": "Cotización de cable de acero"
            }));
            then.status(201).json_body(json!({ "id": "msg_01" }));
        })
        .await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = post_json(
        &app,
        "/contacto",
        json!({
            "name": "Jorge",
            "email": "jorge@fitzone.mx",
            "message": "Cotización de cable de acero"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["id"], "msg_01");
    mock.assert_async().await;
}

#[tokio::test]
async fn contact_form_failure_is_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("POST").path("/store/contact");
            then.status(503).body("down");
        })
        .await;
    let (app, cache) = app(&server, fixtures::default_config());

    let response = post_json(
        &app,
        "/contacto",
        json!({
            "name": "Ana",
            "email": "ana@gym.mx",
            "message": "Hola"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_UNAVAILABLE");
    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(cache.stats().mutation_failures, 1);
}

#[tokio::test]
async fn invalid_contact_form_is_rejected_locally() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("POST").path("/store/contact");
            then.status(201);
        })
        .await;
    let (app, _) = app(&server, fixtures::default_config());

    let response = post_json(
        &app,
        "/contacto",
        json!({ "name": "Ana", "email": "no-es-correo", "message": "Hola" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
    assert_eq!(mock.hits_async().await, 0);
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn readiness_reports_cache_stats() {
    let server = MockServer::start_async().await;
    let (app, _) = app(&server, fixtures::default_config());

    let ping = get(&app, "/health/ping").await;
    assert_eq!(body_text(ping).await, "pong");

    let response = get(&app, "/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["details"]["cache"]["entry_count"], 0);
}
