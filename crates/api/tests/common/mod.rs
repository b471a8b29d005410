#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use agapefy_api::auth::jwt::{generate_access_token, JwtConfig};
use agapefy_api::config::ServerConfig;
use agapefy_api::router::build_app_router;
use agapefy_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        whatsapp_legacy_fallback: false,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, using `pool` for both the regular and
/// the service-role connections.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool.clone(), Some(pool), test_config())
}

/// Same as [`build_test_app`] but with no service-role pool configured.
pub fn build_test_app_without_service_role(pool: PgPool) -> Router {
    build_test_app_with(pool, None, test_config())
}

pub fn build_test_app_with(
    pool: PgPool,
    service_pool: Option<PgPool>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        pool,
        service_pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint a bearer token accepted by [`test_config`].
pub fn token_for(user_id: Uuid, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).expect("token should sign")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_as_user_header(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("x-user-id", user_id)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
