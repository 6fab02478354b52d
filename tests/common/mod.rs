#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{self, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use todo_api::config::AppConfig;
use todo_api::db;
use todo_api::middleware::csrf::CsrfConfig;
use todo_api::routes::build_app;
use todo_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret-key";

/// A fresh in-memory database with the schema applied. One connection only,
/// since every in-memory connection is its own database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        max_connections: 1,
        cors_origins: vec!["*".to_string()],
        csrf: CsrfConfig {
            enabled: true,
            secret: TEST_SECRET.to_string(),
            exempt_paths: vec!["/todos".to_string()],
        },
    }
}

pub async fn build_test_app() -> Router {
    build_test_app_with(test_config()).await
}

pub async fn build_test_app_with(config: AppConfig) -> Router {
    build_test_app_with_pool(test_pool().await, config)
}

/// Builds the app on a pool the caller keeps a handle to.
pub fn build_test_app_with_pool(pool: SqlitePool, config: AppConfig) -> Router {
    build_app(AppState {
        db: pool,
        config: Arc::new(config),
    })
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
