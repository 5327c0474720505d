//! Storage traits.
//!
//! The services talk to persistence only through the traits in this module.
//! Two backends implement all of them:
//!
//! - [`InMemoryStorage`](crate::memory::InMemoryStorage): one lock over plain
//!   maps, used by default and in tests
//! - `PostgresStorage` (in the `filmorate-postgres` crate): `sqlx` over a
//!   connection pool
//!
//! The backend is chosen at startup, so the traits are object safe and return
//! boxed futures; the selected backend travels as a [`Storage`] bundle.
//!
//! # Contract
//!
//! Storage methods do not validate input and do not check that referenced
//! entities exist: the services do both before calling in. Missing entities are
//! reported as `None`/`false`; `Err` is reserved for backend failures.

use crate::error::Result;
use crate::model::{Film, FilmId, Genre, GenreId, Mpa, MpaId, User, UserId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by every storage method.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Film records.
pub trait FilmStorage: Send + Sync {
    /// Insert a film and assign it the next id.
    ///
    /// Genre and MPA names are resolved from the reference tables in the
    /// returned film.
    fn add(&self, film: Film) -> StorageFuture<'_, Film>;

    /// Replace the film stored under `id`. Like edges are kept.
    ///
    /// Returns `None` when no such film exists.
    fn update(&self, id: FilmId, film: Film) -> StorageFuture<'_, Option<Film>>;

    /// Load one film.
    fn get(&self, id: FilmId) -> StorageFuture<'_, Option<Film>>;

    /// All films ordered by id.
    fn list(&self) -> StorageFuture<'_, Vec<Film>>;

    /// Delete a film together with its like edges and return it.
    fn remove(&self, id: FilmId) -> StorageFuture<'_, Option<Film>>;

    /// Whether a film with this id exists.
    fn exists(&self, id: FilmId) -> StorageFuture<'_, bool>;
}

/// User records.
pub trait UserStorage: Send + Sync {
    /// Insert a user and assign it the next id.
    fn add(&self, user: User) -> StorageFuture<'_, User>;

    /// Replace the user stored under `id`.
    ///
    /// Returns `None` when no such user exists.
    fn update(&self, id: UserId, user: User) -> StorageFuture<'_, Option<User>>;

    /// Load one user.
    fn get(&self, id: UserId) -> StorageFuture<'_, Option<User>>;

    /// All users ordered by id.
    fn list(&self) -> StorageFuture<'_, Vec<User>>;

    /// Delete a user together with its friendships and likes and return it.
    fn remove(&self, id: UserId) -> StorageFuture<'_, Option<User>>;

    /// Whether a user with this id exists.
    fn exists(&self, id: UserId) -> StorageFuture<'_, bool>;
}

/// The friendship graph: one undirected edge per pair of users.
pub trait FriendStorage: Send + Sync {
    /// Link two users. Returns `false` if they were already linked.
    fn add_friend(&self, user: UserId, friend: UserId) -> StorageFuture<'_, bool>;

    /// Unlink two users. Returns `false` if they were not linked.
    fn remove_friend(&self, user: UserId, friend: UserId) -> StorageFuture<'_, bool>;

    /// Friends of `user`, ordered by id.
    fn friends(&self, user: UserId) -> StorageFuture<'_, Vec<User>>;

    /// Users linked to both `user` and `other`, ordered by id.
    fn common_friends(&self, user: UserId, other: UserId) -> StorageFuture<'_, Vec<User>>;
}

/// What [`LikeStorage::add_like`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The like was recorded and the rate raised
    Added,
    /// The user had already liked the film
    AlreadyLiked,
    /// The film no longer exists
    FilmMissing,
}

/// Like edges and the popularity counter they drive.
pub trait LikeStorage: Send + Sync {
    /// Record a like and bump the film's rate, atomically.
    ///
    /// Changes nothing unless the outcome is [`LikeOutcome::Added`]. Fails with
    /// [`FilmorateError::Conflict`](crate::FilmorateError::Conflict) if the rate
    /// is already at its maximum.
    fn add_like(&self, film: FilmId, user: UserId) -> StorageFuture<'_, LikeOutcome>;

    /// Remove a like and lower the film's rate (not below zero), atomically.
    ///
    /// Returns `false` (and changes nothing) if there was no such like.
    fn remove_like(&self, film: FilmId, user: UserId) -> StorageFuture<'_, bool>;

    /// Users who liked `film`, ordered by id.
    fn likes(&self, film: FilmId) -> StorageFuture<'_, Vec<UserId>>;

    /// The `limit` most popular films: rate descending, then id ascending.
    fn popular(&self, limit: usize) -> StorageFuture<'_, Vec<Film>>;
}

/// Genre reference table.
pub trait GenreStorage: Send + Sync {
    /// All genres ordered by id.
    fn list(&self) -> StorageFuture<'_, Vec<Genre>>;

    /// Load one genre.
    fn get(&self, id: GenreId) -> StorageFuture<'_, Option<Genre>>;
}

/// MPA rating reference table.
pub trait MpaStorage: Send + Sync {
    /// All ratings ordered by id.
    fn list(&self) -> StorageFuture<'_, Vec<Mpa>>;

    /// Load one rating.
    fn get(&self, id: MpaId) -> StorageFuture<'_, Option<Mpa>>;
}

/// The full set of storage capabilities of one backend.
///
/// Cloning is cheap; every field is shared.
#[derive(Clone)]
pub struct Storage {
    /// Film records
    pub films: Arc<dyn FilmStorage>,
    /// User records
    pub users: Arc<dyn UserStorage>,
    /// Friendship graph
    pub friends: Arc<dyn FriendStorage>,
    /// Like ledger
    pub likes: Arc<dyn LikeStorage>,
    /// Genre table
    pub genres: Arc<dyn GenreStorage>,
    /// MPA table
    pub mpa: Arc<dyn MpaStorage>,
    /// Backend name, reported by the health endpoint
    pub backend: &'static str,
}

impl Storage {
    /// Bundle a backend that implements every storage trait.
    #[must_use]
    pub fn from_backend<B>(backend: B, name: &'static str) -> Self
    where
        B: FilmStorage
            + UserStorage
            + FriendStorage
            + LikeStorage
            + GenreStorage
            + MpaStorage
            + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            films: backend.clone(),
            users: backend.clone(),
            friends: backend.clone(),
            likes: backend.clone(),
            genres: backend.clone(),
            mpa: backend,
            backend: name,
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
