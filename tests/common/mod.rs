#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use bookshelf_app::modules::books::create_module;
use bookshelf_app::{App, SharedBookStore};
use bookshelf_kernel::settings::Settings;
use bookshelf_kernel::ModuleRegistry;

/// Full application router over a migrated in-memory database.
pub async fn build_test_app() -> Router {
    let pool = bookshelf_db::create_memory_pool().await.unwrap();
    let app = App::with_pool(Settings::default(), pool);
    app.prepare().await.unwrap();
    app.router()
}

/// Router whose books module talks to `store` instead of SQL.
pub fn build_app_with_store(store: SharedBookStore) -> Router {
    let mut registry = ModuleRegistry::new();
    registry.register(create_module(store));
    bookshelf_http::build_router(&registry, &Settings::default())
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, body)).await
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Create a book through the API and return its id.
pub async fn create_book(app: &Router, title: &str, author: &str) -> i64 {
    let response = post_json(
        app,
        "/api/books",
        serde_json::json!({ "title": title, "author": author }),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

pub fn shared<S: bookshelf_app::BookStore + 'static>(store: S) -> SharedBookStore {
    Arc::new(store)
}
