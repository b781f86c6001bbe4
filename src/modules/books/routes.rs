//! HTTP handlers for `/books`.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use shelf_http::{AppError, ErrorBody, ValidJson};
use shelf_kernel::timestamp;

use super::models::{Book, BookCreated, BookList, BookPatch, NewBook};
use crate::modules::{create_failed, store_failed, Detail};
use crate::service::RecordService;

const NOT_FOUND: &str = "Book not found";

pub fn router(service: RecordService<Book>) -> Router {
    Router::new()
        .route(
            "/books",
            get(list_books).post(create_book).delete(delete_books),
        )
        .route("/books/", post(create_book))
        .route(
            "/books/{book_id}",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .with_state(service)
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 200, description = "Book created", body = BookCreated),
        (status = 400, description = "Invalid body or store failure", body = ErrorBody)
    )
)]
pub async fn create_book(
    State(service): State<RecordService<Book>>,
    ValidJson(input): ValidJson<NewBook>,
) -> Result<Json<BookCreated>, AppError> {
    let book = service
        .create(Book::from_new(input, timestamp()))
        .await
        .map_err(|e| create_failed("book", e))?;

    Ok(Json(BookCreated {
        detail: "Book created successfully".to_string(),
        book,
    }))
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "No such book", body = ErrorBody)
    )
)]
pub async fn get_book(
    State(service): State<RecordService<Book>>,
    Path(book_id): Path<String>,
) -> Result<Json<Book>, AppError> {
    service
        .get(&book_id)
        .await
        .map_err(|e| store_failed("Error retrieving book", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BookList),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_books(
    State(service): State<RecordService<Book>>,
) -> Result<Json<BookList>, AppError> {
    let books = service
        .list()
        .await
        .map_err(|e| store_failed("Error retrieving books", e))?;

    Ok(Json(BookList { books }))
}

/// Partially update a book
#[utoipa::path(
    patch,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = String, Path, description = "Book id")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "The merged book", body = Book),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such book", body = ErrorBody)
    )
)]
pub async fn update_book(
    State(service): State<RecordService<Book>>,
    Path(book_id): Path<String>,
    ValidJson(patch): ValidJson<BookPatch>,
) -> Result<Json<Book>, AppError> {
    service
        .update(&book_id, patch)
        .await
        .map_err(|e| store_failed("Error updating book", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book deleted", body = Detail),
        (status = 404, description = "No such book", body = ErrorBody)
    )
)]
pub async fn delete_book(
    State(service): State<RecordService<Book>>,
    Path(book_id): Path<String>,
) -> Result<Json<Detail>, AppError> {
    let deleted = service
        .delete(&book_id)
        .await
        .map_err(|e| store_failed("Error deleting book", e))?;

    if !deleted {
        return Err(AppError::not_found(NOT_FOUND));
    }

    Ok(Json(Detail::new(format!("Deleted book {book_id}"))))
}

/// Delete every book
#[utoipa::path(
    delete,
    path = "/books",
    tag = "books",
    responses((status = 200, description = "All books deleted", body = Detail))
)]
pub async fn delete_books(
    State(service): State<RecordService<Book>>,
) -> Result<Json<Detail>, AppError> {
    service
        .delete_all()
        .await
        .map_err(|e| store_failed("Error deleting books", e))?;

    Ok(Json(Detail::new("Deleted all books")))
}
