//! # Filmorate Core
//!
//! Domain model, validation, storage traits and services for the Filmorate
//! film-and-friends backend.
//!
//! ## Core Concepts
//!
//! - **Entity Store**: films and users, addressed by monotonically assigned ids
//! - **Friendship Graph**: a symmetric relation between users, one edge per pair
//! - **Like Ledger**: `(film, user)` edges feeding the film's `rate` and the
//!   popularity ranking
//! - **Reference data**: genres and MPA ratings
//! - **Services**: the boundary where validation and existence checks run
//!   before any storage mutation
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  FilmService / UserService / ReferenceService │  ← validation, existence checks
//! ├──────────────────────────────────────────────┤
//! │  Storage (Arc<dyn FilmStorage>, ...)          │  ← injected capability set
//! ├──────────────────────┬───────────────────────┤
//! │  InMemoryStorage     │  PostgresStorage       │  ← selected at startup
//! └──────────────────────┴───────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use filmorate_core::environment::SystemClock;
//! use filmorate_core::memory::InMemoryStorage;
//! use filmorate_core::service::Services;
//! use std::sync::Arc;
//!
//! # async fn example() -> filmorate_core::error::Result<()> {
//! let services = Services::new(InMemoryStorage::new().into_storage(), Arc::new(SystemClock));
//! let popular = services.films.popular(10).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod model;
pub mod ranking;
pub mod service;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use chrono::NaiveDate;
pub use error::{EntityKind, FilmorateError, Result};
pub use model::{Film, FilmId, Friendship, Genre, GenreId, Mpa, MpaId, User, UserId};
pub use storage::Storage;

/// Environment module - Dependency injection traits
///
/// External dependencies the domain needs (currently only time) are abstracted
/// behind traits so that tests can pin them.
pub mod environment {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Get the current calendar date (UTC)
        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::environment::{Clock, SystemClock};

    #[test]
    fn system_clock_today_matches_now() {
        let clock = SystemClock;
        let now = clock.now();
        let today = clock.today();
        // Midnight rollover between the two calls is the only way these differ
        assert!(today == now.date_naive() || today == now.date_naive().succ_opt().unwrap_or(today));
    }
}
