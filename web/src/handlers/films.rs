//! `/films` endpoints.

use crate::WebResult;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use filmorate_core::model::{Film, FilmId, UserId};
use filmorate_core::ranking::DEFAULT_POPULAR_COUNT;
use serde::Deserialize;

/// Query of `GET /films/popular`.
#[derive(Debug, Deserialize)]
pub struct PopularParams {
    /// Number of films to return; defaults to 10
    pub count: Option<i64>,
}

/// `POST /films`
///
/// # Errors
///
/// 400 on invalid input, 404 on an unknown genre or MPA rating.
pub async fn create_film(
    State(state): State<AppState>,
    ApiJson(film): ApiJson<Film>,
) -> WebResult<(StatusCode, Json<Film>)> {
    let film = state.services.films.add_film(film).await?;
    Ok((StatusCode::CREATED, Json(film)))
}

/// `GET /films`
///
/// # Errors
///
/// 500 if storage fails.
pub async fn list_films(State(state): State<AppState>) -> WebResult<Json<Vec<Film>>> {
    Ok(Json(state.services.films.films().await?))
}

/// `GET /films/{id}`
///
/// # Errors
///
/// 404 on an unknown film.
pub async fn get_film(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<FilmId>,
) -> WebResult<Json<Film>> {
    Ok(Json(state.services.films.film(id).await?))
}

/// `PUT /films`
///
/// # Errors
///
/// 404 on an unknown film, 400 on invalid input.
pub async fn update_film(
    State(state): State<AppState>,
    ApiJson(film): ApiJson<Film>,
) -> WebResult<Json<Film>> {
    Ok(Json(state.services.films.update_film(film).await?))
}

/// `DELETE /films/{id}`, answering with the removed film.
///
/// # Errors
///
/// 404 on an unknown film.
pub async fn delete_film(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<FilmId>,
) -> WebResult<Json<Film>> {
    Ok(Json(state.services.films.remove_film(id).await?))
}

/// `PUT /films/{id}/like/{userId}`
///
/// # Errors
///
/// 404 on an unknown film or user, 409 on a repeated like.
pub async fn add_like(
    State(state): State<AppState>,
    ApiPath((film, user)): ApiPath<(FilmId, UserId)>,
) -> WebResult<StatusCode> {
    state.services.films.like(film, user).await?;
    Ok(StatusCode::OK)
}

/// `DELETE /films/{id}/like/{userId}`
///
/// # Errors
///
/// 404 on an unknown film or user, 409 if there is no such like.
pub async fn remove_like(
    State(state): State<AppState>,
    ApiPath((film, user)): ApiPath<(FilmId, UserId)>,
) -> WebResult<StatusCode> {
    state.services.films.unlike(film, user).await?;
    Ok(StatusCode::OK)
}

/// `GET /films/{id}/likes`: ids of the users who liked the film.
///
/// # Errors
///
/// 404 on an unknown film.
pub async fn list_likes(
    State(state): State<AppState>,
    ApiPath(film): ApiPath<FilmId>,
) -> WebResult<Json<Vec<UserId>>> {
    Ok(Json(state.services.films.likes(film).await?))
}

/// `GET /films/popular?count=N`
///
/// # Errors
///
/// 400 on a non-numeric count.
pub async fn popular_films(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PopularParams>,
) -> WebResult<Json<Vec<Film>>> {
    let count = params.count.unwrap_or(DEFAULT_POPULAR_COUNT);
    Ok(Json(state.services.films.popular(count).await?))
}
