//! Genre and MPA reference tables.

use crate::{PostgresStorage, db_error};
use filmorate_core::Result;
use filmorate_core::model::{Genre, GenreId, Mpa, MpaId};
use filmorate_core::storage::{GenreStorage, MpaStorage, StorageFuture};

#[derive(sqlx::FromRow)]
struct ReferenceRow {
    id: i64,
    name: String,
}

impl PostgresStorage {
    async fn load_genres(&self) -> Result<Vec<Genre>> {
        let rows: Vec<ReferenceRow> = sqlx::query_as("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list genres"))?;

        Ok(rows.into_iter().map(|r| Genre::new(r.id, r.name)).collect())
    }

    async fn load_genre(&self, id: GenreId) -> Result<Option<Genre>> {
        let row: Option<ReferenceRow> = sqlx::query_as("SELECT id, name FROM genres WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load genre"))?;

        Ok(row.map(|r| Genre::new(r.id, r.name)))
    }

    async fn load_mpa_ratings(&self) -> Result<Vec<Mpa>> {
        let rows: Vec<ReferenceRow> = sqlx::query_as("SELECT id, name FROM mpa ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list mpa ratings"))?;

        Ok(rows.into_iter().map(|r| Mpa::new(r.id, r.name)).collect())
    }

    async fn load_mpa(&self, id: MpaId) -> Result<Option<Mpa>> {
        let row: Option<ReferenceRow> = sqlx::query_as("SELECT id, name FROM mpa WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load mpa rating"))?;

        Ok(row.map(|r| Mpa::new(r.id, r.name)))
    }
}

impl GenreStorage for PostgresStorage {
    fn list(&self) -> StorageFuture<'_, Vec<Genre>> {
        Box::pin(self.load_genres())
    }

    fn get(&self, id: GenreId) -> StorageFuture<'_, Option<Genre>> {
        Box::pin(self.load_genre(id))
    }
}

impl MpaStorage for PostgresStorage {
    fn list(&self) -> StorageFuture<'_, Vec<Mpa>> {
        Box::pin(self.load_mpa_ratings())
    }

    fn get(&self, id: MpaId) -> StorageFuture<'_, Option<Mpa>> {
        Box::pin(self.load_mpa(id))
    }
}
