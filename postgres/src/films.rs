//! Film records and their genres.

use crate::{PostgresStorage, db_error, sql_limit};
use chrono::NaiveDate;
use filmorate_core::model::{Film, FilmId, Genre, GenreId, Mpa};
use filmorate_core::storage::{FilmStorage, StorageFuture};
use filmorate_core::{FilmorateError, Result};
use sqlx::{Postgres, Transaction};
use std::collections::BTreeMap;

#[derive(sqlx::FromRow)]
struct FilmRow {
    id: i64,
    name: String,
    description: String,
    release_date: NaiveDate,
    duration: i32,
    rate: i32,
    mpa_id: i64,
    mpa_name: String,
}

#[derive(sqlx::FromRow)]
struct FilmGenreRow {
    film_id: i64,
    genre_id: i64,
    genre_name: String,
}

const SELECT_FILM_BY_ID: &str = r"
    SELECT f.id, f.name, f.description, f.release_date, f.duration, f.rate,
           f.mpa_id, m.name AS mpa_name
    FROM films f
    JOIN mpa m ON m.id = f.mpa_id
    WHERE f.id = $1
";

const SELECT_ALL_FILMS: &str = r"
    SELECT f.id, f.name, f.description, f.release_date, f.duration, f.rate,
           f.mpa_id, m.name AS mpa_name
    FROM films f
    JOIN mpa m ON m.id = f.mpa_id
    ORDER BY f.id
";

const SELECT_POPULAR_FILMS: &str = r"
    SELECT f.id, f.name, f.description, f.release_date, f.duration, f.rate,
           f.mpa_id, m.name AS mpa_name
    FROM films f
    JOIN mpa m ON m.id = f.mpa_id
    ORDER BY f.rate DESC, f.id
    LIMIT $1
";

impl PostgresStorage {
    /// Attach genres to film rows, keeping the row order.
    async fn hydrate(&self, rows: Vec<FilmRow>) -> Result<Vec<Film>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let genre_rows: Vec<FilmGenreRow> = sqlx::query_as(
            r"
            SELECT fg.film_id, g.id AS genre_id, g.name AS genre_name
            FROM film_genres fg
            JOIN genres g ON g.id = fg.genre_id
            WHERE fg.film_id = ANY($1)
            ORDER BY fg.film_id, g.id
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load film genres"))?;

        let mut genres: BTreeMap<i64, Vec<Genre>> = BTreeMap::new();
        for row in genre_rows {
            genres
                .entry(row.film_id)
                .or_default()
                .push(Genre::new(row.genre_id, row.genre_name));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let film_genres = genres.remove(&row.id).unwrap_or_default();
                Film::new(
                    row.name,
                    row.description,
                    row.release_date,
                    row.duration,
                    Mpa::new(row.mpa_id, row.mpa_name),
                )
                .with_rate(row.rate)
                .with_genres(film_genres)
                .with_id(FilmId::new(row.id))
            })
            .collect())
    }

    async fn load_film(&self, id: FilmId) -> Result<Option<Film>> {
        let row: Option<FilmRow> = sqlx::query_as(SELECT_FILM_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load film"))?;

        Ok(self.hydrate(row.into_iter().collect()).await?.pop())
    }

    async fn load_films(&self) -> Result<Vec<Film>> {
        let rows: Vec<FilmRow> = sqlx::query_as(SELECT_ALL_FILMS)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list films"))?;
        self.hydrate(rows).await
    }

    pub(crate) async fn load_popular(&self, limit: usize) -> Result<Vec<Film>> {
        let rows: Vec<FilmRow> = sqlx::query_as(SELECT_POPULAR_FILMS)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("rank films"))?;
        self.hydrate(rows).await
    }

    async fn insert_film(&self, film: Film) -> Result<Film> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO films (name, description, release_date, duration, rate, mpa_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.rate)
        .bind(film.mpa.id.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("insert film"))?;

        insert_genres(&mut tx, id, &film.genre_ids()).await?;
        tx.commit().await.map_err(db_error("commit film"))?;

        self.load_film(FilmId::new(id))
            .await?
            .ok_or_else(|| FilmorateError::storage("inserted film could not be read back"))
    }

    async fn replace_film(&self, id: FilmId, film: Film) -> Result<Option<Film>> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let updated = sqlx::query(
            r"
            UPDATE films
            SET name = $2, description = $3, release_date = $4,
                duration = $5, rate = $6, mpa_id = $7
            WHERE id = $1
            ",
        )
        .bind(id.get())
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.rate)
        .bind(film.mpa.id.get())
        .execute(&mut *tx)
        .await
        .map_err(db_error("update film"))?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        sqlx::query("DELETE FROM film_genres WHERE film_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("clear film genres"))?;
        insert_genres(&mut tx, id.get(), &film.genre_ids()).await?;
        tx.commit().await.map_err(db_error("commit film"))?;

        self.load_film(id).await
    }

    async fn delete_film(&self, id: FilmId) -> Result<Option<Film>> {
        let Some(film) = self.load_film(id).await? else {
            return Ok(None);
        };

        let deleted = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete film"))?
            .rows_affected();

        Ok((deleted > 0).then_some(film))
    }

    async fn film_exists(&self, id: FilmId) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM films WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check film"))
    }
}

async fn insert_genres(
    tx: &mut Transaction<'_, Postgres>,
    film_id: i64,
    genres: &[GenreId],
) -> Result<()> {
    if genres.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = genres.iter().map(|genre| genre.get()).collect();

    sqlx::query(
        r"
        INSERT INTO film_genres (film_id, genre_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT DO NOTHING
        ",
    )
    .bind(film_id)
    .bind(ids)
    .execute(&mut **tx)
    .await
    .map_err(db_error("insert film genres"))?;
    Ok(())
}

impl FilmStorage for PostgresStorage {
    fn add(&self, film: Film) -> StorageFuture<'_, Film> {
        Box::pin(self.insert_film(film))
    }

    fn update(&self, id: FilmId, film: Film) -> StorageFuture<'_, Option<Film>> {
        Box::pin(self.replace_film(id, film))
    }

    fn get(&self, id: FilmId) -> StorageFuture<'_, Option<Film>> {
        Box::pin(self.load_film(id))
    }

    fn list(&self) -> StorageFuture<'_, Vec<Film>> {
        Box::pin(self.load_films())
    }

    fn remove(&self, id: FilmId) -> StorageFuture<'_, Option<Film>> {
        Box::pin(self.delete_film(id))
    }

    fn exists(&self, id: FilmId) -> StorageFuture<'_, bool> {
        Box::pin(self.film_exists(id))
    }
}
