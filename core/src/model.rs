//! Domain types: identifiers, films, users, reference data and friendship edges.
//!
//! JSON field names follow the public API (`releaseDate`, `mpa`, ...), so these
//! types are serialized directly by the web layer.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a film
    FilmId
);
define_id!(
    /// Unique identifier for a user
    UserId
);
define_id!(
    /// Identifier of a genre
    GenreId
);
define_id!(
    /// Identifier of an MPA rating
    MpaId
);

// ============================================================================
// Reference data
// ============================================================================

/// Film genre.
///
/// Clients reference genres by id only; `name` is filled in by the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    /// Genre id
    pub id: GenreId,
    /// Genre name
    #[serde(default)]
    pub name: String,
}

impl Genre {
    /// Create a genre.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: GenreId::new(id),
            name: name.into(),
        }
    }

    /// A reference to a genre by id, as sent by clients.
    #[must_use]
    pub const fn reference(id: i64) -> Self {
        Self {
            id: GenreId::new(id),
            name: String::new(),
        }
    }
}

/// MPA rating (motion picture content classification).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mpa {
    /// Rating id
    pub id: MpaId,
    /// Rating name (`G`, `PG`, ...)
    #[serde(default)]
    pub name: String,
}

impl Mpa {
    /// Create a rating.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: MpaId::new(id),
            name: name.into(),
        }
    }

    /// A reference to a rating by id, as sent by clients.
    #[must_use]
    pub const fn reference(id: i64) -> Self {
        Self {
            id: MpaId::new(id),
            name: String::new(),
        }
    }
}

/// Genres seeded into every store.
#[must_use]
pub fn default_genres() -> Vec<Genre> {
    vec![
        Genre::new(1, "Комедия"),
        Genre::new(2, "Драма"),
        Genre::new(3, "Мультфильм"),
        Genre::new(4, "Триллер"),
        Genre::new(5, "Документальный"),
        Genre::new(6, "Боевик"),
    ]
}

/// MPA ratings seeded into every store.
#[must_use]
pub fn default_mpa_ratings() -> Vec<Mpa> {
    vec![
        Mpa::new(1, "G"),
        Mpa::new(2, "PG"),
        Mpa::new(3, "PG-13"),
        Mpa::new(4, "R"),
        Mpa::new(5, "NC-17"),
    ]
}

/// Treat an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Entities
// ============================================================================

/// A film.
///
/// `id` is `None` until the store assigns one. `rate` is the popularity
/// counter: it starts at the value supplied on creation and moves by one with
/// every like and unlike.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    /// Film id
    #[serde(default)]
    pub id: Option<FilmId>,
    /// Title
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Description, at most 200 characters
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Release date
    pub release_date: NaiveDate,
    /// Duration in minutes
    pub duration: i32,
    /// Popularity counter
    #[serde(default)]
    pub rate: i32,
    /// Genres, unique by id and ordered by id
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    /// MPA rating
    pub mpa: Mpa,
}

impl Film {
    /// Create a film without an id, genres or rate.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        release_date: NaiveDate,
        duration: i32,
        mpa: Mpa,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            release_date,
            duration,
            rate: 0,
            genres: Vec::new(),
            mpa,
        }
    }

    /// Set the initial popularity counter.
    #[must_use]
    pub fn with_rate(mut self, rate: i32) -> Self {
        self.rate = rate;
        self
    }

    /// Set the genres.
    #[must_use]
    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: FilmId) -> Self {
        self.id = Some(id);
        self
    }

    /// Collapse duplicate genres and order them by id.
    pub fn normalize_genres(&mut self) {
        self.genres.sort_by_key(|genre| genre.id);
        self.genres.dedup_by_key(|genre| genre.id);
    }

    /// Ids of the film's genres.
    #[must_use]
    pub fn genre_ids(&self) -> Vec<GenreId> {
        self.genres.iter().map(|genre| genre.id).collect()
    }
}

/// A user.
///
/// Friends are not embedded: the friendship graph owns them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id
    #[serde(default)]
    pub id: Option<UserId>,
    /// E-mail address
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Login, no whitespace
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
    /// Display name; falls back to the login when blank
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Date of birth
    pub birthday: NaiveDate,
}

impl User {
    /// Create a user without an id.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        login: impl Into<String>,
        name: impl Into<String>,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            email: email.into(),
            login: login.into(),
            name: name.into(),
            birthday,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }
}

// ============================================================================
// Edges
// ============================================================================

/// Undirected friendship edge.
///
/// Always stored with `low < high`, so `(a, b)` and `(b, a)` are the same edge
/// and one row (or set entry) represents both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Friendship {
    low: UserId,
    high: UserId,
}

impl Friendship {
    /// Build the normalized edge between two users.
    #[must_use]
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Smaller user id of the pair.
    #[must_use]
    pub const fn low(&self) -> UserId {
        self.low
    }

    /// Larger user id of the pair.
    #[must_use]
    pub const fn high(&self) -> UserId {
        self.high
    }

    /// The other end of the edge, if `user` is one of its ends.
    #[must_use]
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if user == self.low {
            Some(self.high)
        } else if user == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn friendship_is_order_independent() {
        let a = UserId::new(7);
        let b = UserId::new(3);
        assert_eq!(Friendship::new(a, b), Friendship::new(b, a));
        assert_eq!(Friendship::new(a, b).low(), b);
        assert_eq!(Friendship::new(a, b).other(a), Some(b));
        assert_eq!(Friendship::new(a, b).other(UserId::new(1)), None);
    }

    #[test]
    fn film_deserializes_from_api_json() {
        let film: Film = serde_json::from_str(
            r#"{
                "name": "Film 1",
                "description": "desc",
                "releaseDate": "2022-01-01",
                "duration": 120,
                "rate": 5,
                "mpa": { "id": 1 },
                "genres": [{ "id": 2 }, { "id": 1 }, { "id": 2 }]
            }"#,
        )
        .unwrap();

        assert_eq!(film.id, None);
        assert_eq!(film.release_date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(film.mpa.id, MpaId::new(1));

        let mut film = film;
        film.normalize_genres();
        assert_eq!(film.genre_ids(), vec![GenreId::new(1), GenreId::new(2)]);
    }

    #[test]
    fn film_serializes_camel_case_with_bare_ids() {
        let film = Film::new(
            "Film",
            "",
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            90,
            Mpa::new(1, "G"),
        )
        .with_id(FilmId::new(3));
        let json = serde_json::to_value(&film).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["releaseDate"], "2000-01-01");
        assert_eq!(json["mpa"]["name"], "G");
    }

    #[test]
    fn user_name_is_optional_in_json() {
        let user: User = serde_json::from_str(
            r#"{ "email": "a@b.c", "login": "alice", "birthday": "1990-05-15" }"#,
        )
        .unwrap();
        assert!(user.name.is_empty());
    }
}
