//! # Filmorate Testing
//!
//! Testing utilities shared by the Filmorate crates.
//!
//! This crate provides:
//! - A fixed [`Clock`] so birthday checks are deterministic
//! - Film and user fixtures, including the popularity scenario films
//! - proptest strategies for valid and invalid input
//! - In-memory service wiring
//!
//! ## Example
//!
//! ```
//! use filmorate_testing::{fixtures, in_memory_services};
//!
//! # async fn example() -> filmorate_core::Result<()> {
//! let services = in_memory_services();
//! let film = services.films.add_film(fixtures::film("Film 1")).await?;
//! assert_eq!(film.id.map(|id| id.get()), Some(1));
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use filmorate_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use filmorate_testing::mocks::FixedClock;
    /// use filmorate_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2024-06-01 12:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Build a date, panicking on an invalid one.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixture date should be valid")
}

/// Film and user fixtures.
pub mod fixtures {
    use super::date;
    use filmorate_core::model::{Film, Genre, Mpa, User};

    /// A valid film with the given name.
    #[must_use]
    pub fn film(name: &str) -> Film {
        Film::new(name, "A film", date(2000, 1, 1), 100, Mpa::reference(1))
    }

    /// A valid film with genres by id.
    #[must_use]
    pub fn film_with_genres(name: &str, genres: &[i64]) -> Film {
        film(name).with_genres(genres.iter().map(|id| Genre::reference(*id)).collect())
    }

    /// The three films of the popularity scenario, rated 5, 4 and 7.
    #[must_use]
    pub fn popularity_films() -> Vec<Film> {
        vec![
            Film::new("Film 1", "", date(2022, 1, 1), 120, Mpa::reference(1)).with_rate(5),
            Film::new("Film 2", "", date(2022, 2, 1), 130, Mpa::reference(2)).with_rate(4),
            Film::new("Film 3", "", date(2020, 3, 1), 140, Mpa::reference(2)).with_rate(7),
        ]
    }

    /// A valid user with the given login and no display name.
    #[must_use]
    pub fn user(login: &str) -> User {
        User::new(format!("{login}@example.com"), login, "", date(1990, 5, 15))
    }
}

/// Property-based testing utilities.
pub mod properties {
    use super::date;
    use filmorate_core::model::{Film, Mpa};
    use proptest::prelude::*;

    /// Logins accepted by the validation layer.
    pub fn valid_login() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.-]{1,24}"
    }

    /// Logins rejected for containing whitespace.
    pub fn login_with_whitespace() -> impl Strategy<Value = String> {
        ("[a-z]{1,8}", "[ \t]{1,3}", "[a-z]{1,8}").prop_map(|(a, gap, b)| format!("{a}{gap}{b}"))
    }

    /// Films that pass validation, with any rate in `0..1000`.
    pub fn valid_film() -> impl Strategy<Value = Film> {
        (
            "[A-Za-z][A-Za-z ]{0,30}",
            "[a-z ]{0,200}",
            0i64..40_000,
            1i32..600,
            1i64..=5,
            0i32..1000,
        )
            .prop_map(|(name, description, days, duration, mpa, rate)| {
                Film::new(
                    name,
                    description,
                    date(1895, 12, 28) + chrono::Duration::days(days),
                    duration,
                    Mpa::reference(mpa),
                )
                .with_rate(rate)
            })
    }
}

/// Test helpers.
pub mod helpers {
    use super::mocks::test_clock;
    use filmorate_core::memory::InMemoryStorage;
    use filmorate_core::service::Services;
    use std::sync::Arc;

    /// Services over a fresh in-memory store and the fixed test clock.
    #[must_use]
    pub fn in_memory_services() -> Services {
        Services::new(InMemoryStorage::new().into_storage(), Arc::new(test_clock()))
    }

    /// Install a fmt subscriber for test output; safe to call repeatedly.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("filmorate=debug")
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::{in_memory_services, init_tracing};
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use filmorate_core::validation::{validate_film, validate_user};
    use proptest::prelude::*;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), date(2024, 6, 1));
    }

    #[test]
    fn fixtures_are_valid() {
        assert!(validate_film(&fixtures::film("A")).is_ok());
        for film in fixtures::popularity_films() {
            assert!(validate_film(&film).is_ok());
        }
        assert!(validate_user(&fixtures::user("alice"), test_clock().today()).is_ok());
    }

    #[tokio::test]
    async fn in_memory_services_start_empty() {
        let services = in_memory_services();
        assert!(services.films.films().await.unwrap().is_empty());
        assert_eq!(services.backend(), "memory");
    }

    proptest! {
        #[test]
        fn generated_films_validate(film in properties::valid_film()) {
            prop_assert!(validate_film(&film).is_ok());
        }

        #[test]
        fn whitespace_logins_fail(login in properties::login_with_whitespace()) {
            let mut user = fixtures::user("x");
            user.login = login;
            prop_assert!(validate_user(&user, test_clock().today()).is_err());
        }

        #[test]
        fn plain_logins_pass(login in properties::valid_login()) {
            let mut user = fixtures::user("x");
            user.login = login;
            prop_assert!(validate_user(&user, test_clock().today()).is_ok());
        }
    }
}
