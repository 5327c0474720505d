//! Like edges and the film rate they drive.

use crate::{PostgresStorage, db_error};
use filmorate_core::model::{Film, FilmId, UserId};
use filmorate_core::storage::{LikeOutcome, LikeStorage, StorageFuture};
use filmorate_core::{FilmorateError, Result};

impl PostgresStorage {
    async fn insert_like(&self, film: FilmId, user: UserId) -> Result<LikeOutcome> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        // Serializes likes on this film and blocks its deletion until commit
        let rate: Option<i32> =
            sqlx::query_scalar("SELECT rate FROM films WHERE id = $1 FOR UPDATE")
                .bind(film.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("lock film"))?;

        let Some(rate) = rate else {
            return Ok(LikeOutcome::FilmMissing);
        };

        let inserted = sqlx::query(
            "INSERT INTO film_likes (film_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(film.get())
        .bind(user.get())
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert like"))?
        .rows_affected();

        if inserted == 0 {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        let raised = rate.checked_add(1).ok_or_else(FilmorateError::rate_exhausted)?;
        sqlx::query("UPDATE films SET rate = $2 WHERE id = $1")
            .bind(film.get())
            .bind(raised)
            .execute(&mut *tx)
            .await
            .map_err(db_error("raise film rate"))?;

        tx.commit().await.map_err(db_error("commit like"))?;
        Ok(LikeOutcome::Added)
    }

    async fn delete_like(&self, film: FilmId, user: UserId) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let deleted = sqlx::query("DELETE FROM film_likes WHERE film_id = $1 AND user_id = $2")
            .bind(film.get())
            .bind(user.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete like"))?
            .rows_affected();

        if deleted == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE films SET rate = GREATEST(rate - 1, 0) WHERE id = $1")
            .bind(film.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("lower film rate"))?;

        tx.commit().await.map_err(db_error("commit unlike"))?;
        Ok(true)
    }

    async fn load_likes(&self, film: FilmId) -> Result<Vec<UserId>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT user_id FROM film_likes WHERE film_id = $1 ORDER BY user_id",
        )
        .bind(film.get())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list likes"))?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }
}

impl LikeStorage for PostgresStorage {
    fn add_like(&self, film: FilmId, user: UserId) -> StorageFuture<'_, LikeOutcome> {
        Box::pin(self.insert_like(film, user))
    }

    fn remove_like(&self, film: FilmId, user: UserId) -> StorageFuture<'_, bool> {
        Box::pin(self.delete_like(film, user))
    }

    fn likes(&self, film: FilmId) -> StorageFuture<'_, Vec<UserId>> {
        Box::pin(self.load_likes(film))
    }

    fn popular(&self, limit: usize) -> StorageFuture<'_, Vec<Film>> {
        Box::pin(self.load_popular(limit))
    }
}
