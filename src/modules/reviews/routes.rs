//! HTTP handlers for reviews, nested under the book they review.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use shelf_http::{AppError, ErrorBody, ValidJson};
use shelf_kernel::timestamp;

use super::models::{NewReview, Review, ReviewCreated, ReviewList, ReviewPatch};
use super::store::ReviewStore;
use crate::modules::{create_failed, store_failed, Detail};
use crate::service::RecordService;

const NOT_FOUND: &str = "Review not found";

#[derive(Clone)]
pub struct ReviewsState {
    pub service: RecordService<Review>,
    pub store: Arc<dyn ReviewStore>,
}

pub fn router(state: ReviewsState) -> Router {
    Router::new()
        .route(
            "/books/{book_id}/reviews",
            get(list_book_reviews).post(create_review),
        )
        .route("/reviews", axum::routing::delete(delete_reviews))
        .route(
            "/reviews/{review_id}",
            get(get_review).patch(update_review).delete(delete_review),
        )
        .with_state(state)
}

/// Review a book
#[utoipa::path(
    post,
    path = "/books/{book_id}/reviews",
    tag = "reviews",
    params(("book_id" = String, Path, description = "Reviewed book id")),
    request_body = NewReview,
    responses(
        (status = 200, description = "Review created", body = ReviewCreated),
        (status = 400, description = "Invalid body or store failure", body = ErrorBody)
    )
)]
pub async fn create_review(
    State(state): State<ReviewsState>,
    Path(book_id): Path<String>,
    ValidJson(input): ValidJson<NewReview>,
) -> Result<Json<ReviewCreated>, AppError> {
    if input.conflicts_with(&book_id) {
        return Err(AppError::bad_request(format!(
            "book_id in body does not match book {book_id}"
        )));
    }

    let review = state
        .service
        .create(Review::from_new(input, book_id, timestamp()))
        .await
        .map_err(|e| create_failed("review", e))?;

    Ok(Json(ReviewCreated {
        detail: "Review created successfully".to_string(),
        review,
    }))
}

/// List the reviews of a book
#[utoipa::path(
    get,
    path = "/books/{book_id}/reviews",
    tag = "reviews",
    params(("book_id" = String, Path, description = "Reviewed book id")),
    responses(
        (status = 200, description = "Reviews of the book, possibly none", body = ReviewList),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_book_reviews(
    State(state): State<ReviewsState>,
    Path(book_id): Path<String>,
) -> Result<Json<ReviewList>, AppError> {
    let reviews = state
        .store
        .list_for_book(&book_id)
        .await
        .map_err(|e| store_failed("Error retrieving reviews", e))?;

    if reviews.is_empty() {
        tracing::warn!(book_id = %book_id, "no reviews for book");
    } else {
        tracing::debug!(book_id = %book_id, count = reviews.len(), "listed reviews");
    }

    Ok(Json(ReviewList { reviews }))
}

/// Get a review by id
#[utoipa::path(
    get,
    path = "/reviews/{review_id}",
    tag = "reviews",
    params(("review_id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "The review", body = Review),
        (status = 404, description = "No such review", body = ErrorBody)
    )
)]
pub async fn get_review(
    State(state): State<ReviewsState>,
    Path(review_id): Path<String>,
) -> Result<Json<Review>, AppError> {
    state
        .service
        .get(&review_id)
        .await
        .map_err(|e| store_failed("Error retrieving review", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// Partially update a review
#[utoipa::path(
    patch,
    path = "/reviews/{review_id}",
    tag = "reviews",
    params(("review_id" = String, Path, description = "Review id")),
    request_body = ReviewPatch,
    responses(
        (status = 200, description = "The merged review", body = Review),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such review", body = ErrorBody)
    )
)]
pub async fn update_review(
    State(state): State<ReviewsState>,
    Path(review_id): Path<String>,
    ValidJson(patch): ValidJson<ReviewPatch>,
) -> Result<Json<Review>, AppError> {
    state
        .service
        .update(&review_id, patch)
        .await
        .map_err(|e| store_failed("Error updating review", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// Delete a review
#[utoipa::path(
    delete,
    path = "/reviews/{review_id}",
    tag = "reviews",
    params(("review_id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted", body = Detail),
        (status = 404, description = "No such review", body = ErrorBody)
    )
)]
pub async fn delete_review(
    State(state): State<ReviewsState>,
    Path(review_id): Path<String>,
) -> Result<Json<Detail>, AppError> {
    let deleted = state
        .service
        .delete(&review_id)
        .await
        .map_err(|e| store_failed("Error deleting review", e))?;

    if !deleted {
        return Err(AppError::not_found(NOT_FOUND));
    }

    Ok(Json(Detail::new(format!("Deleted review {review_id}"))))
}

/// Delete every review
#[utoipa::path(
    delete,
    path = "/reviews",
    tag = "reviews",
    responses((status = 200, description = "All reviews deleted", body = Detail))
)]
pub async fn delete_reviews(State(state): State<ReviewsState>) -> Result<Json<Detail>, AppError> {
    state
        .service
        .delete_all()
        .await
        .map_err(|e| store_failed("Error deleting reviews", e))?;

    Ok(Json(Detail::new("Deleted all reviews")))
}
