//! HTTP handlers for `/users`.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use shelf_http::{AppError, ErrorBody, ValidJson};
use shelf_kernel::timestamp;

use super::models::{NewUser, User, UserCreated, UserList, UserPatch};
use crate::modules::{create_failed, store_failed, Detail};
use crate::service::RecordService;

const NOT_FOUND: &str = "User not found";

pub fn router(service: RecordService<User>) -> Router {
    Router::new()
        .route(
            "/users",
            get(list_users).post(create_user).delete(delete_users),
        )
        .route("/users/", post(create_user))
        .route(
            "/users/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(service)
}

/// Register a user
#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    request_body = NewUser,
    responses(
        (status = 200, description = "User created", body = UserCreated),
        (status = 400, description = "Invalid body or store failure", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(service): State<RecordService<User>>,
    ValidJson(input): ValidJson<NewUser>,
) -> Result<Json<UserCreated>, AppError> {
    let user = service
        .create(User::from_new(input, timestamp()))
        .await
        .map_err(|e| create_failed("user", e))?;

    Ok(Json(UserCreated {
        detail: "User created successfully".to_string(),
        user,
    }))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(service): State<RecordService<User>>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, AppError> {
    service
        .get(&user_id)
        .await
        .map_err(|e| store_failed("Error retrieving user", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = UserList),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_users(
    State(service): State<RecordService<User>>,
) -> Result<Json<UserList>, AppError> {
    let users = service
        .list()
        .await
        .map_err(|e| store_failed("Error retrieving users", e))?;

    Ok(Json(UserList { users }))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "The merged user", body = User),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(service): State<RecordService<User>>,
    Path(user_id): Path<String>,
    ValidJson(patch): ValidJson<UserPatch>,
) -> Result<Json<User>, AppError> {
    service
        .update(&user_id, patch)
        .await
        .map_err(|e| store_failed("Error updating user", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = Detail),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(service): State<RecordService<User>>,
    Path(user_id): Path<String>,
) -> Result<Json<Detail>, AppError> {
    let deleted = service
        .delete(&user_id)
        .await
        .map_err(|e| store_failed("Error deleting user", e))?;

    if !deleted {
        return Err(AppError::not_found(NOT_FOUND));
    }

    Ok(Json(Detail::new(format!("Deleted user {user_id}"))))
}

/// Delete every user
#[utoipa::path(
    delete,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "All users deleted", body = Detail))
)]
pub async fn delete_users(
    State(service): State<RecordService<User>>,
) -> Result<Json<Detail>, AppError> {
    service
        .delete_all()
        .await
        .map_err(|e| store_failed("Error deleting users", e))?;

    Ok(Json(Detail::new("Deleted all users")))
}
