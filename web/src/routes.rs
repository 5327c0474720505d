//! Router assembly.

use crate::handlers::{films, health, reference, users};
use crate::middleware::track_request;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;

/// Build the full HTTP API over `state`.
///
/// Every route runs under the tracing and correlation-ID layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/films",
            get(films::list_films)
                .post(films::create_film)
                .put(films::update_film),
        )
        .route("/films/popular", get(films::popular_films))
        .route(
            "/films/:id",
            get(films::get_film).delete(films::delete_film),
        )
        .route("/films/:id/likes", get(films::list_likes))
        .route(
            "/films/:id/like/:user_id",
            put(films::add_like).delete(films::remove_like),
        )
        .route(
            "/users",
            get(users::list_users)
                .post(users::create_user)
                .put(users::update_user),
        )
        .route(
            "/users/:id",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/users/:id/friends", get(users::list_friends))
        .route(
            "/users/:id/friends/:friend_id",
            put(users::add_friend).delete(users::remove_friend),
        )
        .route(
            "/users/:id/friends/common/:other_id",
            get(users::common_friends),
        )
        .route("/genres", get(reference::list_genres))
        .route("/genres/:id", get(reference::get_genre))
        .route("/mpa", get(reference::list_mpa))
        .route("/mpa/:id", get(reference::get_mpa))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(track_request))
        .with_state(state)
}
