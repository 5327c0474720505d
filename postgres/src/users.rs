//! User records.

use crate::{PostgresStorage, db_error};
use chrono::NaiveDate;
use filmorate_core::Result;
use filmorate_core::model::{User, UserId};
use filmorate_core::storage::{StorageFuture, UserStorage};

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    id: i64,
    email: String,
    login: String,
    name: String,
    birthday: NaiveDate,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self::new(row.email, row.login, row.name, row.birthday).with_id(UserId::new(row.id))
    }
}

impl PostgresStorage {
    async fn insert_user(&self, user: User) -> Result<User> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (email, login, name, birthday)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, login, name, birthday
            ",
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("insert user"))?;

        Ok(row.into())
    }

    async fn replace_user(&self, id: UserId, user: User) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            UPDATE users
            SET email = $2, login = $3, name = $4, birthday = $5
            WHERE id = $1
            RETURNING id, email, login, name, birthday
            ",
        )
        .bind(id.get())
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update user"))?;

        Ok(row.map(User::from))
    }

    async fn load_user(&self, id: UserId) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, email, login, name, birthday FROM users WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("load user"))?;

        Ok(row.map(User::from))
    }

    async fn load_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT id, email, login, name, birthday FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("list users"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Delete a user. Friendships and likes go with it through `ON DELETE
    /// CASCADE`; the rate of every film the user liked drops by one first.
    async fn delete_user(&self, id: UserId) -> Result<Option<User>> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        sqlx::query(
            r"
            UPDATE films
            SET rate = GREATEST(rate - 1, 0)
            WHERE id IN (SELECT film_id FROM film_likes WHERE user_id = $1)
            ",
        )
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(db_error("release user likes"))?;

        let row: Option<UserRow> = sqlx::query_as(
            "DELETE FROM users WHERE id = $1 RETURNING id, email, login, name, birthday",
        )
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("delete user"))?;

        if row.is_some() {
            tx.commit().await.map_err(db_error("commit user removal"))?;
        }
        Ok(row.map(User::from))
    }

    async fn user_exists(&self, id: UserId) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check user"))
    }
}

impl UserStorage for PostgresStorage {
    fn add(&self, user: User) -> StorageFuture<'_, User> {
        Box::pin(self.insert_user(user))
    }

    fn update(&self, id: UserId, user: User) -> StorageFuture<'_, Option<User>> {
        Box::pin(self.replace_user(id, user))
    }

    fn get(&self, id: UserId) -> StorageFuture<'_, Option<User>> {
        Box::pin(self.load_user(id))
    }

    fn list(&self) -> StorageFuture<'_, Vec<User>> {
        Box::pin(self.load_users())
    }

    fn remove(&self, id: UserId) -> StorageFuture<'_, Option<User>> {
        Box::pin(self.delete_user(id))
    }

    fn exists(&self, id: UserId) -> StorageFuture<'_, bool> {
        Box::pin(self.user_exists(id))
    }
}
