//! `/genres` and `/mpa` lookups.

use crate::WebResult;
use crate::extractors::ApiPath;
use crate::state::AppState;
use axum::{Json, extract::State};
use filmorate_core::model::{Genre, GenreId, Mpa, MpaId};

/// `GET /genres`
///
/// # Errors
///
/// 500 if storage fails.
pub async fn list_genres(State(state): State<AppState>) -> WebResult<Json<Vec<Genre>>> {
    Ok(Json(state.services.reference.genres().await?))
}

/// `GET /genres/{id}`
///
/// # Errors
///
/// 404 on an unknown genre.
pub async fn get_genre(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<GenreId>,
) -> WebResult<Json<Genre>> {
    Ok(Json(state.services.reference.genre(id).await?))
}

/// `GET /mpa`
///
/// # Errors
///
/// 500 if storage fails.
pub async fn list_mpa(State(state): State<AppState>) -> WebResult<Json<Vec<Mpa>>> {
    Ok(Json(state.services.reference.mpa_ratings().await?))
}

/// `GET /mpa/{id}`
///
/// # Errors
///
/// 404 on an unknown rating.
pub async fn get_mpa(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MpaId>,
) -> WebResult<Json<Mpa>> {
    Ok(Json(state.services.reference.mpa(id).await?))
}
