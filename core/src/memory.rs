//! In-memory storage backend.
//!
//! All tables of one backend instance live in a single [`MemoryState`] behind
//! one `RwLock`. Every operation takes the lock once, so check-then-insert on an
//! edge and the like/rate bump are atomic with respect to other requests.

use crate::error::{FilmorateError, Result};
use crate::model::{
    Film, FilmId, Friendship, Genre, GenreId, Mpa, MpaId, User, UserId, default_genres,
    default_mpa_ratings,
};
use crate::ranking::rank_popular;
use crate::storage::{
    FilmStorage, FriendStorage, GenreStorage, LikeOutcome, LikeStorage, MpaStorage, Storage,
    StorageFuture, UserStorage,
};
use std::collections::{BTreeMap, BTreeSet};
use std::future::ready;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
struct MemoryState {
    films: BTreeMap<FilmId, Film>,
    users: BTreeMap<UserId, User>,
    friendships: BTreeSet<Friendship>,
    likes: BTreeSet<(FilmId, UserId)>,
    genres: BTreeMap<GenreId, Genre>,
    mpa: BTreeMap<MpaId, Mpa>,
    next_film_id: i64,
    next_user_id: i64,
}

impl MemoryState {
    fn new() -> Self {
        Self {
            films: BTreeMap::new(),
            users: BTreeMap::new(),
            friendships: BTreeSet::new(),
            likes: BTreeSet::new(),
            genres: default_genres().into_iter().map(|g| (g.id, g)).collect(),
            mpa: default_mpa_ratings().into_iter().map(|m| (m.id, m)).collect(),
            next_film_id: 1,
            next_user_id: 1,
        }
    }

    /// Normalize genres and fill in reference names.
    fn resolve(&self, mut film: Film) -> Film {
        film.normalize_genres();
        for genre in &mut film.genres {
            if let Some(known) = self.genres.get(&genre.id) {
                genre.name.clone_from(&known.name);
            }
        }
        if let Some(known) = self.mpa.get(&film.mpa.id) {
            film.mpa.name.clone_from(&known.name);
        }
        film
    }

    fn friend_ids(&self, user: UserId) -> BTreeSet<UserId> {
        self.friendships
            .iter()
            .filter_map(|edge| edge.other(user))
            .collect()
    }

    fn users_by_id(&self, ids: impl IntoIterator<Item = UserId>) -> Vec<User> {
        ids.into_iter()
            .filter_map(|id| self.users.get(&id).cloned())
            .collect()
    }
}

/// In-memory implementation of every storage trait.
///
/// Clones share the same tables.
///
/// # Example
///
/// ```
/// use filmorate_core::memory::InMemoryStorage;
///
/// let storage = InMemoryStorage::new().into_storage();
/// assert_eq!(storage.backend, "memory");
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryStorage {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStorage {
    /// Create an empty store seeded with the reference genres and ratings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::new())),
        }
    }

    /// Wrap this store as a [`Storage`] bundle.
    #[must_use]
    pub fn into_storage(self) -> Storage {
        Storage::from_backend(self, "memory")
    }

    fn read<'a, T: Send + 'a>(
        &'a self,
        f: impl FnOnce(&MemoryState) -> T,
    ) -> StorageFuture<'a, T> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Box::pin(ready(Ok(f(&state))))
    }

    fn write<'a, T: Send + 'a>(
        &'a self,
        f: impl FnOnce(&mut MemoryState) -> T,
    ) -> StorageFuture<'a, T> {
        self.try_write(|state| Ok(f(state)))
    }

    /// Poisoning is ignored: no mutation panics between its checks and its writes.
    fn try_write<'a, T: Send + 'a>(
        &'a self,
        f: impl FnOnce(&mut MemoryState) -> Result<T>,
    ) -> StorageFuture<'a, T> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        Box::pin(ready(f(&mut state)))
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FilmStorage for InMemoryStorage {
    fn add(&self, film: Film) -> StorageFuture<'_, Film> {
        self.write(|state| {
            let id = FilmId::new(state.next_film_id);
            state.next_film_id += 1;
            let film = state.resolve(film).with_id(id);
            state.films.insert(id, film.clone());
            film
        })
    }

    fn update(&self, id: FilmId, film: Film) -> StorageFuture<'_, Option<Film>> {
        self.write(|state| {
            if !state.films.contains_key(&id) {
                return None;
            }
            let film = state.resolve(film).with_id(id);
            state.films.insert(id, film.clone());
            Some(film)
        })
    }

    fn get(&self, id: FilmId) -> StorageFuture<'_, Option<Film>> {
        self.read(|state| state.films.get(&id).cloned())
    }

    fn list(&self) -> StorageFuture<'_, Vec<Film>> {
        self.read(|state| state.films.values().cloned().collect())
    }

    fn remove(&self, id: FilmId) -> StorageFuture<'_, Option<Film>> {
        self.write(|state| {
            let film = state.films.remove(&id)?;
            state.likes.retain(|(film_id, _)| *film_id != id);
            Some(film)
        })
    }

    fn exists(&self, id: FilmId) -> StorageFuture<'_, bool> {
        self.read(|state| state.films.contains_key(&id))
    }
}

impl UserStorage for InMemoryStorage {
    fn add(&self, user: User) -> StorageFuture<'_, User> {
        self.write(|state| {
            let id = UserId::new(state.next_user_id);
            state.next_user_id += 1;
            let user = user.with_id(id);
            state.users.insert(id, user.clone());
            user
        })
    }

    fn update(&self, id: UserId, user: User) -> StorageFuture<'_, Option<User>> {
        self.write(|state| {
            let slot = state.users.get_mut(&id)?;
            *slot = user.with_id(id);
            Some(slot.clone())
        })
    }

    fn get(&self, id: UserId) -> StorageFuture<'_, Option<User>> {
        self.read(|state| state.users.get(&id).cloned())
    }

    fn list(&self) -> StorageFuture<'_, Vec<User>> {
        self.read(|state| state.users.values().cloned().collect())
    }

    fn remove(&self, id: UserId) -> StorageFuture<'_, Option<User>> {
        self.write(|state| {
            let user = state.users.remove(&id)?;
            state.friendships.retain(|edge| edge.other(id).is_none());

            let liked: Vec<FilmId> = state
                .likes
                .iter()
                .filter(|(_, user_id)| *user_id == id)
                .map(|(film_id, _)| *film_id)
                .collect();
            for film_id in liked {
                state.likes.remove(&(film_id, id));
                if let Some(film) = state.films.get_mut(&film_id) {
                    film.rate = (film.rate - 1).max(0);
                }
            }
            Some(user)
        })
    }

    fn exists(&self, id: UserId) -> StorageFuture<'_, bool> {
        self.read(|state| state.users.contains_key(&id))
    }
}

impl FriendStorage for InMemoryStorage {
    fn add_friend(&self, user: UserId, friend: UserId) -> StorageFuture<'_, bool> {
        self.write(|state| {
            state.friendships.insert(Friendship::new(user, friend))
        })
    }

    fn remove_friend(&self, user: UserId, friend: UserId) -> StorageFuture<'_, bool> {
        self.write(|state| {
            state.friendships.remove(&Friendship::new(user, friend))
        })
    }

    fn friends(&self, user: UserId) -> StorageFuture<'_, Vec<User>> {
        self.read(|state| {
            state.users_by_id(state.friend_ids(user))
        })
    }

    fn common_friends(&self, user: UserId, other: UserId) -> StorageFuture<'_, Vec<User>> {
        self.read(|state| {
            let mine = state.friend_ids(user);
            let theirs = state.friend_ids(other);
            state.users_by_id(mine.intersection(&theirs).copied())
        })
    }
}

impl LikeStorage for InMemoryStorage {
    fn add_like(&self, film: FilmId, user: UserId) -> StorageFuture<'_, LikeOutcome> {
        self.try_write(|state| {
            let Some(record) = state.films.get_mut(&film) else {
                return Ok(LikeOutcome::FilmMissing);
            };
            if state.likes.contains(&(film, user)) {
                return Ok(LikeOutcome::AlreadyLiked);
            }
            record.rate = record
                .rate
                .checked_add(1)
                .ok_or_else(FilmorateError::rate_exhausted)?;
            state.likes.insert((film, user));
            Ok(LikeOutcome::Added)
        })
    }

    fn remove_like(&self, film: FilmId, user: UserId) -> StorageFuture<'_, bool> {
        self.write(|state| {
            if !state.likes.remove(&(film, user)) {
                return false;
            }
            if let Some(record) = state.films.get_mut(&film) {
                record.rate = (record.rate - 1).max(0);
            }
            true
        })
    }

    fn likes(&self, film: FilmId) -> StorageFuture<'_, Vec<UserId>> {
        self.read(|state| {
            state
                .likes
                .range((film, UserId::new(i64::MIN))..=(film, UserId::new(i64::MAX)))
                .map(|(_, user)| *user)
                .collect()
        })
    }

    fn popular(&self, limit: usize) -> StorageFuture<'_, Vec<Film>> {
        self.read(|state| {
            rank_popular(state.films.values().cloned().collect(), limit)
        })
    }
}

impl GenreStorage for InMemoryStorage {
    fn list(&self) -> StorageFuture<'_, Vec<Genre>> {
        self.read(|state| state.genres.values().cloned().collect())
    }

    fn get(&self, id: GenreId) -> StorageFuture<'_, Option<Genre>> {
        self.read(|state| state.genres.get(&id).cloned())
    }
}

impl MpaStorage for InMemoryStorage {
    fn list(&self) -> StorageFuture<'_, Vec<Mpa>> {
        self.read(|state| state.mpa.values().cloned().collect())
    }

    fn get(&self, id: MpaId) -> StorageFuture<'_, Option<Mpa>> {
        self.read(|state| state.mpa.get(&id).cloned())
    }
}
