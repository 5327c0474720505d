//! `/users` endpoints.

use crate::WebResult;
use crate::extractors::{ApiJson, ApiPath};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use filmorate_core::model::{User, UserId};

/// `POST /users`
///
/// # Errors
///
/// 400 on invalid input.
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(user): ApiJson<User>,
) -> WebResult<(StatusCode, Json<User>)> {
    let user = state.services.users.add_user(user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users`
///
/// # Errors
///
/// 500 if storage fails.
pub async fn list_users(State(state): State<AppState>) -> WebResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.users().await?))
}

/// `GET /users/{id}`
///
/// # Errors
///
/// 404 on an unknown user.
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> WebResult<Json<User>> {
    Ok(Json(state.services.users.user(id).await?))
}

/// `PUT /users`
///
/// # Errors
///
/// 404 on an unknown user, 400 on invalid input.
pub async fn update_user(
    State(state): State<AppState>,
    ApiJson(user): ApiJson<User>,
) -> WebResult<Json<User>> {
    Ok(Json(state.services.users.update_user(user).await?))
}

/// `DELETE /users/{id}`, answering with the removed user.
///
/// # Errors
///
/// 404 on an unknown user.
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> WebResult<Json<User>> {
    Ok(Json(state.services.users.remove_user(id).await?))
}

/// `PUT /users/{id}/friends/{friendId}`
///
/// # Errors
///
/// 404 on an unknown user, 400 on self-friendship, 409 if already friends.
pub async fn add_friend(
    State(state): State<AppState>,
    ApiPath((user, friend)): ApiPath<(UserId, UserId)>,
) -> WebResult<StatusCode> {
    state.services.users.add_friend(user, friend).await?;
    Ok(StatusCode::OK)
}

/// `DELETE /users/{id}/friends/{friendId}`
///
/// # Errors
///
/// 404 on an unknown user, 409 if the users are not friends.
pub async fn remove_friend(
    State(state): State<AppState>,
    ApiPath((user, friend)): ApiPath<(UserId, UserId)>,
) -> WebResult<StatusCode> {
    state.services.users.remove_friend(user, friend).await?;
    Ok(StatusCode::OK)
}

/// `GET /users/{id}/friends`
///
/// # Errors
///
/// 404 on an unknown user.
pub async fn list_friends(
    State(state): State<AppState>,
    ApiPath(user): ApiPath<UserId>,
) -> WebResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.friends(user).await?))
}

/// `GET /users/{id}/friends/common/{otherId}`
///
/// # Errors
///
/// 404 if either user is unknown.
pub async fn common_friends(
    State(state): State<AppState>,
    ApiPath((user, other)): ApiPath<(UserId, UserId)>,
) -> WebResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.common_friends(user, other).await?))
}
