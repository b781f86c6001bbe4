//! Router over in-memory stores, driven request by request with `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use shelf_api::modules::books::models::Book;
use shelf_api::modules::reviews::models::Review;
use shelf_api::modules::users::models::User;
use shelf_api::modules::{books, reviews, users};
use shelf_db::MemoryStore;
use shelf_kernel::settings::Settings;
use shelf_kernel::ModuleRegistry;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryStore<User>>,
    pub books: Arc<MemoryStore<Book>>,
    pub reviews: Arc<MemoryStore<Review>>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryStore::<User>::new());
        let books = Arc::new(MemoryStore::<Book>::new());
        let reviews = Arc::new(MemoryStore::<Review>::new());

        let mut registry = ModuleRegistry::new();
        registry.register(users::create_module(users.clone()));
        registry.register(books::create_module(books.clone()));
        registry.register(reviews::create_module(reviews.clone()));

        let router = shelf_http::build_router(&registry, &Settings::default());
        Self {
            router,
            users,
            books,
            reviews,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        call(&self.router, method, uri, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

/// Send one request through `router` and decode the JSON body, if any.
pub async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}
