use crate::error::{EntityKind, FilmorateError, Result};
use crate::model::{Film, FilmId, UserId};
use crate::ranking::clamp_limit;
use crate::storage::{LikeOutcome, Storage};
use crate::validation::validate_film;
use tracing::{debug, info};

/// Films and the like ledger.
#[derive(Clone)]
pub struct FilmService {
    storage: Storage,
}

impl FilmService {
    /// Create the service.
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Validate and store a new film. Any client-supplied id is ignored.
    ///
    /// # Errors
    ///
    /// - [`FilmorateError::Validation`] if the film breaks a rule
    /// - [`FilmorateError::NotFound`] if its MPA rating or a genre is unknown
    #[tracing::instrument(skip(self, film), fields(name = %film.name))]
    pub async fn add_film(&self, mut film: Film) -> Result<Film> {
        validate_film(&film)?;
        self.ensure_references(&film).await?;

        film.id = None;
        let film = self.storage.films.add(film).await?;

        metrics::counter!("filmorate.films.created").increment(1);
        info!(film_id = ?film.id, "Film added");
        Ok(film)
    }

    /// Replace an existing film.
    ///
    /// # Errors
    ///
    /// - [`FilmorateError::Validation`] if the id is missing or the film breaks a rule
    /// - [`FilmorateError::NotFound`] if the film, its MPA rating or a genre is unknown
    #[tracing::instrument(skip(self, film), fields(film_id = ?film.id))]
    pub async fn update_film(&self, film: Film) -> Result<Film> {
        let id = film
            .id
            .ok_or_else(|| FilmorateError::validation("Не указан id фильма"))?;
        self.ensure_film(id).await?;
        validate_film(&film)?;
        self.ensure_references(&film).await?;

        let film = self
            .storage
            .films
            .update(id, film)
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::Film, id))?;

        info!("Film updated");
        Ok(film)
    }

    /// All films ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::Storage`] if the backend fails.
    pub async fn films(&self) -> Result<Vec<Film>> {
        self.storage.films.list().await
    }

    /// One film.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown id.
    pub async fn film(&self, id: FilmId) -> Result<Film> {
        self.storage
            .films
            .get(id)
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::Film, id))
    }

    /// Delete a film and its likes, returning the deleted film.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn remove_film(&self, id: FilmId) -> Result<Film> {
        let film = self
            .storage
            .films
            .remove(id)
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::Film, id))?;

        info!("Film removed");
        Ok(film)
    }

    /// Record that `user` likes `film`.
    ///
    /// # Errors
    ///
    /// - [`FilmorateError::NotFound`] if the film or the user is unknown
    /// - [`FilmorateError::Conflict`] if the user already liked the film or its
    ///   rate cannot grow any further
    #[tracing::instrument(skip(self))]
    pub async fn like(&self, film: FilmId, user: UserId) -> Result<()> {
        self.ensure_film(film).await?;
        self.ensure_user(user).await?;

        match self.storage.likes.add_like(film, user).await? {
            LikeOutcome::Added => {}
            LikeOutcome::AlreadyLiked => {
                debug!("Duplicate like rejected");
                return Err(FilmorateError::conflict(
                    "Пользователь уже поставил лайк этому фильму",
                ));
            }
            LikeOutcome::FilmMissing => {
                return Err(FilmorateError::not_found(EntityKind::Film, film));
            }
        }

        metrics::counter!("filmorate.likes", "op" => "add").increment(1);
        info!("Like added");
        Ok(())
    }

    /// Withdraw a like.
    ///
    /// # Errors
    ///
    /// - [`FilmorateError::NotFound`] if the film or the user is unknown
    /// - [`FilmorateError::Conflict`] if the user has not liked the film
    #[tracing::instrument(skip(self))]
    pub async fn unlike(&self, film: FilmId, user: UserId) -> Result<()> {
        self.ensure_film(film).await?;
        self.ensure_user(user).await?;

        if !self.storage.likes.remove_like(film, user).await? {
            debug!("Missing like rejected");
            return Err(FilmorateError::conflict(
                "Пользователь не ставил лайк этому фильму",
            ));
        }

        metrics::counter!("filmorate.likes", "op" => "remove").increment(1);
        info!("Like removed");
        Ok(())
    }

    /// Users who liked a film, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown film.
    pub async fn likes(&self, film: FilmId) -> Result<Vec<UserId>> {
        self.ensure_film(film).await?;
        self.storage.likes.likes(film).await
    }

    /// The `count` most popular films.
    ///
    /// A non-positive `count` yields an empty list; a `count` above the number
    /// of films yields all of them.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::Storage`] if the backend fails.
    pub async fn popular(&self, count: i64) -> Result<Vec<Film>> {
        let limit = clamp_limit(count);
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.storage.likes.popular(limit).await
    }

    async fn ensure_film(&self, id: FilmId) -> Result<()> {
        if self.storage.films.exists(id).await? {
            Ok(())
        } else {
            Err(FilmorateError::not_found(EntityKind::Film, id))
        }
    }

    async fn ensure_user(&self, id: UserId) -> Result<()> {
        if self.storage.users.exists(id).await? {
            Ok(())
        } else {
            Err(FilmorateError::not_found(EntityKind::User, id))
        }
    }

    async fn ensure_references(&self, film: &Film) -> Result<()> {
        if self.storage.mpa.get(film.mpa.id).await?.is_none() {
            return Err(FilmorateError::not_found(EntityKind::Mpa, film.mpa.id));
        }
        for genre in film.genre_ids() {
            if self.storage.genres.get(genre).await?.is_none() {
                return Err(FilmorateError::not_found(EntityKind::Genre, genre));
            }
        }
        Ok(())
    }
}
