//! Tests against a real PostgreSQL. Skipped unless TEST_DATABASE_URL is set.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use trip_admin::auth::{authenticate, issue_token, token::find_or_create_user, token::TEST_USER_EMAIL};
use trip_admin::seed::ADMIN_EMAIL;
use trip_admin::{app, apply_migrations, issue_test_token, resources, seed_admin, AppError, AppState, Settings};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return None;
    };
    trip_admin::ensure_database_exists(&url).await.unwrap();
    let pool = PgPoolOptions::new().max_connections(4).connect(&url).await.unwrap();
    MIGRATED
        .get_or_try_init(|| async {
            let registry = resources::registry()?;
            apply_migrations(&pool, &registry).await
        })
        .await
        .map_err(|e: AppError| e.to_string())
        .unwrap();
    Some(pool)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

#[tokio::test]
async fn seeding_twice_keeps_one_admin() {
    let Some(pool) = pool().await else { return };
    let first = seed_admin(&pool).await.unwrap();
    let second = seed_admin(&pool).await.unwrap();
    assert_eq!(first, second);

    let (count, is_admin): (i64, bool) =
        sqlx::query_as("SELECT COUNT(*), BOOL_AND(\"is_admin\") FROM \"users\" WHERE \"email\" = $1")
            .bind(ADMIN_EMAIL)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
    assert!(is_admin);
}

#[tokio::test]
async fn test_token_rotates() {
    let Some(pool) = pool().await else { return };
    let first = issue_test_token(&pool).await.unwrap();
    let second = issue_test_token(&pool).await.unwrap();
    assert_ne!(first, second);

    let (id, secret) = second.split_once('|').unwrap();
    assert!(id.parse::<i64>().is_ok());
    assert_eq!(secret.len(), 40);

    assert!(matches!(authenticate(&pool, &first).await, Err(AppError::Unauthorized(_))));
    let user = authenticate(&pool, &second).await.unwrap();
    assert_eq!(user.email, TEST_USER_EMAIL);
    assert!(!user.is_admin);

    assert_eq!(test_user_tokens(&pool).await, 1);

    let (a, b) = tokio::join!(issue_test_token(&pool), issue_test_token(&pool));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(test_user_tokens(&pool).await, 1);
    let valid = authenticate(&pool, &a).await.is_ok() as u8 + authenticate(&pool, &b).await.is_ok() as u8;
    assert_eq!(valid, 1);
}

async fn test_user_tokens(pool: &PgPool) -> i64 {
    let (tokens,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM \"personal_access_tokens\" t JOIN \"users\" u ON u.\"id\" = t.\"user_id\" WHERE u.\"email\" = $1",
    )
    .bind(TEST_USER_EMAIL)
    .fetch_one(pool)
    .await
    .unwrap();
    tokens
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let Some(pool) = pool().await else { return };
    let (user_id, _) = find_or_create_user(&pool, &format!("{}@example.com", unique("expired")), "Expired", "password", true)
        .await
        .unwrap();
    let past = chrono::Utc::now() - chrono::Duration::hours(1);
    let token = issue_token(&pool, user_id, "short-lived", Some(past)).await.unwrap();
    assert!(matches!(authenticate(&pool, &token).await, Err(AppError::Unauthorized(_))));
}

struct Client {
    state: AppState,
    token: String,
}

impl Client {
    async fn admin(pool: PgPool) -> Client {
        let email = format!("{}@example.com", unique("admin"));
        let (user_id, _) = find_or_create_user(&pool, &email, "Panel Admin", "password", true).await.unwrap();
        let token = issue_token(&pool, user_id, "tests", None).await.unwrap();
        let state = AppState::new(pool, resources::registry().unwrap(), Settings::from_lookup(|_| None).unwrap());
        Client { state, token }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app(self.state.clone()).oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

async fn trip(pool: &PgPool) -> i64 {
    let (user_id, _) = find_or_create_user(pool, &format!("{}@example.com", unique("owner")), "Owner", "password", false)
        .await
        .unwrap();
    let (id,): (i64,) = sqlx::query_as("INSERT INTO \"trips\" (\"user_id\", \"title\") VALUES ($1, 'Lisbon') RETURNING \"id\"")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn non_admin_tokens_are_forbidden() {
    let Some(pool) = pool().await else { return };
    let (user_id, _) = find_or_create_user(&pool, &format!("{}@example.com", unique("member")), "Member", "password", false)
        .await
        .unwrap();
    let token = issue_token(&pool, user_id, "tests", None).await.unwrap();
    let state = AppState::new(pool, resources::registry().unwrap(), Settings::from_lookup(|_| None).unwrap());
    let req = Request::builder()
        .uri("/admin")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn checklist_item_round_trip() {
    let Some(pool) = pool().await else { return };
    let trip_id = trip(&pool).await;
    let client = Client::admin(pool).await;

    let (status, body) = client.send("GET", "/admin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["navigation"].as_array().unwrap().len(), 12);

    let (status, body) = client
        .send("POST", "/admin/checklist-items", Some(json!({"trip_id": trip_id, "title": "Pack passport"})))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["is_completed"], false);

    let (status, body) = client.send("GET", &format!("/admin/checklist-items/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Pack passport");

    let (status, body) = client
        .send("PATCH", &format!("/admin/checklist-items/{}", id), Some(json!({"is_completed": "1"})))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["is_completed"], true);
    assert_eq!(body["data"]["title"], "Pack passport");

    let (status, body) = client
        .send("GET", "/admin/checklist-items?search=passport&sort=id&direction=asc", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["meta"]["pagination"]["total"].as_u64().unwrap() >= 1);

    let (status, _) = client.send("DELETE", &format!("/admin/checklist-items/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = client.send("GET", &format!("/admin/checklist-items/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn share_tokens_are_generated() {
    let Some(pool) = pool().await else { return };
    let trip_id = trip(&pool).await;
    let (user_id, _) = find_or_create_user(&pool, &format!("{}@example.com", unique("guest")), "Guest", "password", false)
        .await
        .unwrap();
    let client = Client::admin(pool).await;

    let (status, body) = client
        .send("POST", "/admin/shares", Some(json!({"trip_id": trip_id, "user_id": user_id})))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["token"].as_str().unwrap().len(), 32);
    assert_eq!(body["data"]["permission"], "viewer");
}

#[tokio::test]
async fn dangling_references_are_field_errors() {
    let Some(pool) = pool().await else { return };
    let client = Client::admin(pool).await;

    let (status, body) = client
        .send("POST", "/admin/checklist-items", Some(json!({"trip_id": i64::MAX, "title": "Nowhere"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["details"]["trip_id"].is_array());

    let (status, body) = client
        .send(
            "POST",
            "/admin/favorites",
            Some(json!({"user_id": 1, "favoritable_type": "trip_diary", "favoritable_id": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
}

#[tokio::test]
async fn bulk_delete_counts_rows() {
    let Some(pool) = pool().await else { return };
    let trip_id = trip(&pool).await;
    let client = Client::admin(pool).await;

    let mut ids = Vec::new();
    for title in ["Sunscreen", "Adapter", "Tickets"] {
        let (_, body) = client
            .send("POST", "/admin/checklist-items", Some(json!({"trip_id": trip_id, "title": title})))
            .await;
        ids.push(body["data"]["id"].as_i64().unwrap());
    }
    ids.push(i64::MAX);

    let (status, body) = client.send("POST", "/admin/checklist-items/bulk-delete", Some(json!({"ids": ids}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 3);

    let too_many: Vec<i64> = (1..=101).collect();
    let (status, _) = client
        .send("POST", "/admin/checklist-items/bulk-delete", Some(json!({"ids": too_many})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_slugs_and_records_are_not_found() {
    let Some(pool) = pool().await else { return };
    let client = Client::admin(pool).await;
    let (status, _) = client.send("GET", "/admin/spaceships", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = client.send("GET", "/admin/places/not-a-number", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = client.send("GET", "/admin/places?sort=address", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
