mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use shelf_api::modules::books::models::Book;
use shelf_db::RecordStore;
use shelf_kernel::timestamp;

#[tokio::test]
async fn create_then_fetch_book() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/books/",
            json!({"title": "A Great Book", "author": "George Orwell", "isbn": "1234567890"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Book created successfully");

    let id = body["book"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, book) = app.get(&format!("/books/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "A Great Book");
    assert_eq!(book["author"], "George Orwell");
    assert_eq!(book["isbn"], "1234567890");
    assert!(book["created_at"].is_string());
}

#[tokio::test]
async fn create_without_trailing_slash() {
    let app = TestApp::new();
    let (status, _) = app
        .post("/books", json!({"title": "Animal Farm Revisited", "author": "George Orwell"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.books.len().await, 1);
}

#[tokio::test]
async fn patch_title_keeps_author() {
    let app = TestApp::new();
    app.books
        .create(Book {
            id: "1".into(),
            title: "Nineteen Eighty-Four".into(),
            author: "George Orwell".into(),
            isbn: None,
            created_at: timestamp(),
        })
        .await
        .unwrap();

    let (status, book) = app.patch("/books/1", json!({"title": "1984 (Updated)"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["id"], "1");
    assert_eq!(book["title"], "1984 (Updated)");
    assert_eq!(book["author"], "George Orwell");

    let stored = app.books.get_by_id("1").await.unwrap().unwrap();
    assert_eq!(stored.title, "1984 (Updated)");
}

#[tokio::test]
async fn patch_cannot_move_id() {
    let app = TestApp::new();
    app.books
        .create(Book {
            id: "1".into(),
            title: "Nineteen Eighty-Four".into(),
            author: "George Orwell".into(),
            isbn: Some("1234567890".into()),
            created_at: timestamp(),
        })
        .await
        .unwrap();

    let (status, book) = app
        .patch("/books/1", json!({"id": "2", "isbn": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["id"], "1");
    assert!(book["isbn"].is_null());
    assert!(app.books.get_by_id("2").await.unwrap().is_none());
}

#[tokio::test]
async fn missing_book_is_404() {
    let app = TestApp::new();

    let (status, body) = app.get("/books/200").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Book not found"}));

    let (status, _) = app.patch("/books/200", json!({"title": "Some Other Title"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/books/200").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_all_on_empty_table() {
    let app = TestApp::new();
    let (status, body) = app.delete("/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Deleted all books");
}

#[tokio::test]
async fn list_and_delete() {
    let app = TestApp::new();

    let (status, body) = app.get("/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"books": []}));

    let (_, created) = app
        .post("/books/", json!({"title": "Homage to Catalonia", "author": "George Orwell"}))
        .await;
    let id = created["book"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.get("/books").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 1);

    let (status, body) = app.delete(&format!("/books/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], format!("Deleted book {id}"));
    assert!(app.books.is_empty().await);
}

#[tokio::test]
async fn invalid_bodies_are_400() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/books/", json!({"title": "Short", "author": "George Orwell"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "title");

    let (status, _) = app.post("/books/", json!({"title": "Missing The Author"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.books.is_empty().await);
}

#[tokio::test]
async fn duplicate_id_is_a_store_conflict() {
    let app = TestApp::new();
    let book = Book {
        id: "dup".into(),
        title: "Burmese Days Again".into(),
        author: "George Orwell".into(),
        isbn: None,
        created_at: timestamp(),
    };
    app.books.create(book.clone()).await.unwrap();
    let err = app.books.create(book).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn null_title_patch_is_rejected() {
    let app = TestApp::new();
    app.books
        .create(Book {
            id: "1".into(),
            title: "Nineteen Eighty-Four".into(),
            author: "George Orwell".into(),
            isbn: None,
            created_at: timestamp(),
        })
        .await
        .unwrap();

    let (status, _) = app.patch("/books/1", json!({"title": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = app.books.get_by_id("1").await.unwrap().unwrap();
    assert_eq!(stored.title, "Nineteen Eighty-Four");
}
