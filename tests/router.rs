//! Router-level tests that never reach the database: the pool is created lazily and
//! every request here is answered before a connection is needed.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use trip_admin::{app, resources, AppState, Settings};

fn router() -> Router {
    let settings = Settings::from_lookup(|_| None).unwrap();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://nobody@127.0.0.1:1/unreachable")
        .unwrap();
    app(AppState::new(pool, resources::registry().unwrap(), settings))
}

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let resp = router().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn version_reports_package() {
    let (status, body) = send(get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "trip-admin");
}

#[tokio::test]
async fn admin_requires_a_token() {
    for uri in ["/admin", "/admin/places", "/admin/places/1", "/admin/comments/create"] {
        let (status, body) = send(get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["error"]["code"], "unauthenticated");
    }
}

#[tokio::test]
async fn malformed_authorization_is_rejected() {
    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer    ", "token 1|abc"] {
        let req = Request::builder()
            .uri("/admin/trip-diaries")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", value);
    }
}

#[tokio::test]
async fn mutations_require_a_token() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/admin/shares/3")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("POST")
        .uri("/admin/shares/bulk-delete")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"ids":[1,2]}"#))
        .unwrap();
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_validates_before_lookup() {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"  ","password":""}"#))
        .unwrap();
    let (status, body) = send(req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"]["email"].is_array());
    assert!(body["error"]["details"]["password"].is_array());
}

#[tokio::test]
async fn openapi_document_lists_resources() {
    let (status, body) = send(get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "trip-admin");
    assert!(body["paths"]["/admin/checkpoint-images/{record}"]["get"].is_object());
    assert_eq!(body["components"]["securitySchemes"]["bearer_auth"]["scheme"], "bearer");
}

#[tokio::test]
async fn documentation_page_is_served() {
    let resp = router().oneshot(get("/api/documentation")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/openapi.json"));
    assert!(html.contains("dom_id: \"#swagger-ui\""));
    assert!(html.trim_end().ends_with("</html>"));
}
