//! API integration tests
//!
//! Drive the full router over the in-memory record store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookstore_api::{
    api,
    config::AppConfig,
    models::Book,
    repository::{BookStore, MemoryBookStore},
    services::Services,
    AppState,
};

fn app_with(store: Arc<MemoryBookStore>) -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(store)),
    };
    api::router(state)
}

fn sample_store() -> Arc<MemoryBookStore> {
    let books = [("1", "Sample Book 1"), ("2", "Sample Book 2")].map(|(id, title)| {
        let mut book = Book::new(title);
        book.id = Some(id.to_string());
        book
    });
    Arc::new(MemoryBookStore::with_books(books))
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("Router failed to respond")
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Failed to parse response")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app_with(Arc::new(MemoryBookStore::new()));

    let response = send(&app, empty_request("GET", "/api/health")).await;
    assert!(response.status().is_success());

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_with_memory_store() {
    let app = app_with(Arc::new(MemoryBookStore::new()));

    let response = send(&app, empty_request("GET", "/api/ready")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_books_envelope() {
    let app = app_with(sample_store());

    let response = send(&app, empty_request("GET", "/api/books?pageNumber=1&pageSize=5")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalBooks"], 2);
    let titles: Vec<&str> = body["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Sample Book 1", "Sample Book 2"]);
}

#[tokio::test]
async fn test_list_books_second_page() {
    let store = Arc::new(MemoryBookStore::new());
    for i in 1..=7 {
        store.insert(Book::new(format!("Book {}", i))).await.unwrap();
    }
    let app = app_with(store);

    let response = send(&app, empty_request("GET", "/api/books?pageNumber=2&pageSize=3")).await;
    let body = body_json(response).await;

    assert_eq!(body["totalBooks"], 7);
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(books[0]["title"], "Book 4");
    assert_eq!(books[2]["title"], "Book 6");
}

#[tokio::test]
async fn test_list_books_rejects_bad_pagination() {
    let app = app_with(sample_store());

    for uri in [
        "/api/books?pageNumber=0&pageSize=5",
        "/api/books?pageNumber=1&pageSize=0",
        "/api/books?pageNumber=-3&pageSize=5",
        "/api/books?pageNumber=one&pageSize=5",
    ] {
        let response = send(&app, empty_request("GET", uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_get_unknown_book_is_not_found() {
    let app = app_with(sample_store());

    let response = send(&app, empty_request("GET", "/api/books/does-not-exist")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_get_update_delete_book() {
    let store = Arc::new(MemoryBookStore::new());
    let app = app_with(store.clone());

    // Create
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/books",
            json!({"title": "Test Book", "author": "Test Author", "price": "12.50"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();
    let created = body_json(response).await;
    let id = created["id"].as_str().expect("No book id").to_string();
    assert_eq!(location, format!("/api/books/{}", id));
    assert_eq!(created["price"], "12.50");

    // Fetch through the advertised location
    let response = send(&app, empty_request("GET", &location)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Test Book");

    // Full replace
    let response = send(
        &app,
        json_request("PUT", &location, json!({"title": "Renamed", "price": 8})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stored = store.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Renamed");
    assert_eq!(stored.author, None);
    assert_eq!(stored.price, Decimal::new(8, 0));

    // Delete
    let response = send(&app, empty_request("DELETE", &location)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.get_by_id(&id).await.unwrap().is_none());

    let response = send(&app, empty_request("DELETE", &location)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_with_empty_title_is_rejected() {
    let store = Arc::new(MemoryBookStore::new());
    let app = app_with(store.clone());

    let response = send(&app, json_request("POST", "/api/books", json!({"title": ""}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_unknown_book_is_not_found() {
    let store = sample_store();
    let app = app_with(store.clone());

    let response = send(
        &app,
        json_request("PUT", "/api/books/42", json!({"title": "Ghost"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(store.get_by_id("42").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_existing_book_without_body_is_bad_request() {
    let store = sample_store();
    let app = app_with(store.clone());

    let response = send(&app, empty_request("PUT", "/api/books/1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        store.get_by_id("1").await.unwrap().unwrap().title,
        "Sample Book 1"
    );
}
