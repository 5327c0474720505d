//! Error types for Filmorate domain operations.

use std::fmt;
use thiserror::Error;

/// Result type alias for Filmorate operations.
pub type Result<T> = std::result::Result<T, FilmorateError>;

/// Kind of entity an id refers to, used in not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A film.
    Film,
    /// A user.
    User,
    /// A genre.
    Genre,
    /// An MPA rating.
    Mpa,
}

impl EntityKind {
    /// Human-readable entity name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Film => "Фильм",
            Self::User => "Пользователь",
            Self::Genre => "Жанр",
            Self::Mpa => "Рейтинг MPA",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error taxonomy for Filmorate.
///
/// Every variant maps to exactly one HTTP status at the web boundary:
///
/// | Variant      | Status |
/// |--------------|--------|
/// | `Validation` | 400    |
/// | `NotFound`   | 404    |
/// | `Conflict`   | 409    |
/// | `Storage`    | 500    |
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilmorateError {
    /// Input failed a validation rule. Carries the human-readable reason.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} с id {id} не найден")]
    NotFound {
        /// Kind of the missing entity
        entity: EntityKind,
        /// The id that was looked up
        id: i64,
    },

    /// The operation violates a relationship invariant
    /// (duplicate like or friendship, removing a missing edge).
    #[error("{0}")]
    Conflict(String),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FilmorateError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Create a not-found error for the given entity and id.
    #[must_use]
    pub fn not_found(entity: EntityKind, id: impl Into<i64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a conflict error.
    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    /// The film's rate is at `i32::MAX` and cannot take another like.
    #[must_use]
    pub fn rate_exhausted() -> Self {
        Self::conflict("Рейтинг фильма достиг максимального значения")
    }

    /// Create a storage error.
    #[must_use]
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage(reason.into())
    }

    /// Whether this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = FilmorateError::not_found(EntityKind::Film, 42);
        assert_eq!(err.to_string(), "Фильм с id 42 не найден");
        assert!(err.is_not_found());
    }

    #[test]
    fn validation_display_is_the_reason() {
        let err = FilmorateError::validation("Логин не может содержать пробелы");
        assert_eq!(err.to_string(), "Логин не может содержать пробелы");
        assert!(!err.is_not_found());
    }

    #[test]
    fn storage_display_is_prefixed() {
        let err = FilmorateError::storage("connection refused");
        assert_eq!(err.to_string(), "Storage error: connection refused");
    }
}
