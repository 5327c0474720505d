use crate::error::{EntityKind, FilmorateError, Result};
use crate::model::{Genre, GenreId, Mpa, MpaId};
use crate::storage::Storage;

/// Read access to genres and MPA ratings.
#[derive(Clone)]
pub struct ReferenceService {
    storage: Storage,
}

impl ReferenceService {
    /// Create the service.
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All genres ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::Storage`] if the backend fails.
    pub async fn genres(&self) -> Result<Vec<Genre>> {
        self.storage.genres.list().await
    }

    /// One genre.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown id.
    pub async fn genre(&self, id: GenreId) -> Result<Genre> {
        self.storage
            .genres
            .get(id)
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::Genre, id))
    }

    /// All MPA ratings ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::Storage`] if the backend fails.
    pub async fn mpa_ratings(&self) -> Result<Vec<Mpa>> {
        self.storage.mpa.list().await
    }

    /// One MPA rating.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown id.
    pub async fn mpa(&self, id: MpaId) -> Result<Mpa> {
        self.storage
            .mpa
            .get(id)
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::Mpa, id))
    }
}
