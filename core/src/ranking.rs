//! Popularity ranking.
//!
//! Both backends rank films the same way: `rate` descending, ties broken by id
//! ascending. The in-memory backend ranks with [`rank_popular`]; the `PostgreSQL`
//! backend expresses the same order in SQL.

use crate::model::Film;
use std::cmp::Reverse;

/// Default number of films returned by the popular query.
pub const DEFAULT_POPULAR_COUNT: i64 = 10;

/// Convert a requested count into a result length.
///
/// Non-positive counts yield zero; anything larger than `usize` saturates.
#[must_use]
pub fn clamp_limit(count: i64) -> usize {
    if count <= 0 {
        0
    } else {
        usize::try_from(count).unwrap_or(usize::MAX)
    }
}

/// Rank films by popularity and keep the first `limit`.
///
/// A `limit` above the number of films returns all of them.
#[must_use]
pub fn rank_popular(mut films: Vec<Film>, limit: usize) -> Vec<Film> {
    films.sort_by_key(|film| (Reverse(film.rate), film.id));
    films.truncate(limit);
    films
}
