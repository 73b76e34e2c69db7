mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use tower_sessions::MemoryStore;

use common::FakeBackend;

#[tokio::test]
async fn unmatched_paths_render_404_page() -> Result<()> {
    let backend = FakeBackend::new();
    let router = common::router(backend.clone());

    let requests = vec![
        common::get("/nope", None),
        common::json_request("POST", "/nope", &json!({}), None),
        common::get("/api/posts/abc123/extra", None),
        // Known paths, wrong method
        common::form_request("/", "", None),
        common::get("/logout", None),
        common::delete("/login", None),
        common::json_request("POST", "/health", &json!({}), None),
        common::get("/api/posts/abc123", None),
        common::json_request("PATCH", "/api/posts/abc123", &json!({"title": "x"}), None),
        common::delete("/api/posts", None),
    ];

    for request in requests {
        let label = format!("{} {}", request.method(), request.uri());
        let res = common::send(&router, request).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{label}");
        let body = common::body_text(res).await;
        assert!(body.contains("Page not found"), "{label}");
    }

    assert!(backend.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn wrong_method_with_session_skips_backend() -> Result<()> {
    let backend = FakeBackend::new();
    let router = common::router(backend.clone());
    let cookie = common::login(&router).await;

    let res = common::send(
        &router,
        common::json_request("PATCH", "/api/posts/abc123", &json!({"title": "x"}), Some(&cookie)),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(common::body_text(res).await.contains("Page not found"));
    assert!(backend.collection_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn health_reports_backend_state() -> Result<()> {
    let backend = FakeBackend::new();
    let router = common::router(backend.clone());

    let res = common::send(&router, common::get("/health", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::body_json(res).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());

    backend.set_healthy(false);
    let res = common::send(&router, common::get("/health", None)).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = common::body_json(res).await;
    assert_eq!(body["backend"], "unavailable");
    Ok(())
}

#[tokio::test]
async fn rate_limit_answers_429_once_budget_is_spent() -> Result<()> {
    let mut config = common::test_config();
    config.api.enable_rate_limiting = true;
    config.api.rate_limit_requests = 2;
    let router = common::router_with(FakeBackend::new(), config, MemoryStore::default());

    for _ in 0..2 {
        let res = common::send(&router, common::get("/login", None)).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = common::send(&router, common::get("/login", None)).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        common::body_json(res).await,
        json!({"error": "Too many requests, please try again later."})
    );
    Ok(())
}

#[tokio::test]
async fn handler_panic_renders_error_page() -> Result<()> {
    let router = common::router(FakeBackend::new());
    let cookie = common::login(&router).await;

    let res = common::send(&router, common::get("/api/panic", Some(&cookie))).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::body_text(res).await;
    assert!(body.contains("Internal Server Error"));
    Ok(())
}
