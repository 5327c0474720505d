//! The friendship graph: one row per pair, `user_id < friend_id`.

use crate::users::UserRow;
use crate::{PostgresStorage, db_error};
use filmorate_core::Result;
use filmorate_core::model::{Friendship, User, UserId};
use filmorate_core::storage::{FriendStorage, StorageFuture};

impl PostgresStorage {
    async fn insert_friendship(&self, user: UserId, friend: UserId) -> Result<bool> {
        let edge = Friendship::new(user, friend);
        let inserted = sqlx::query(
            "INSERT INTO friendships (user_id, friend_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(edge.low().get())
        .bind(edge.high().get())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert friendship"))?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn delete_friendship(&self, user: UserId, friend: UserId) -> Result<bool> {
        let edge = Friendship::new(user, friend);
        let deleted = sqlx::query("DELETE FROM friendships WHERE user_id = $1 AND friend_id = $2")
            .bind(edge.low().get())
            .bind(edge.high().get())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete friendship"))?
            .rows_affected();

        Ok(deleted == 1)
    }

    async fn load_friends(&self, user: UserId) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r"
            SELECT u.id, u.email, u.login, u.name, u.birthday
            FROM users u
            JOIN friendships f
              ON (f.user_id = $1 AND f.friend_id = u.id)
              OR (f.friend_id = $1 AND f.user_id = u.id)
            ORDER BY u.id
            ",
        )
        .bind(user.get())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list friends"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn load_common_friends(&self, user: UserId, other: UserId) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r"
            WITH mine AS (
                SELECT friend_id AS id FROM friendships WHERE user_id = $1
                UNION
                SELECT user_id FROM friendships WHERE friend_id = $1
            ),
            theirs AS (
                SELECT friend_id AS id FROM friendships WHERE user_id = $2
                UNION
                SELECT user_id FROM friendships WHERE friend_id = $2
            )
            SELECT u.id, u.email, u.login, u.name, u.birthday
            FROM users u
            WHERE u.id IN (SELECT id FROM mine INTERSECT SELECT id FROM theirs)
            ORDER BY u.id
            ",
        )
        .bind(user.get())
        .bind(other.get())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list common friends"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

impl FriendStorage for PostgresStorage {
    fn add_friend(&self, user: UserId, friend: UserId) -> StorageFuture<'_, bool> {
        Box::pin(self.insert_friendship(user, friend))
    }

    fn remove_friend(&self, user: UserId, friend: UserId) -> StorageFuture<'_, bool> {
        Box::pin(self.delete_friendship(user, friend))
    }

    fn friends(&self, user: UserId) -> StorageFuture<'_, Vec<User>> {
        Box::pin(self.load_friends(user))
    }

    fn common_friends(&self, user: UserId, other: UserId) -> StorageFuture<'_, Vec<User>> {
        Box::pin(self.load_common_friends(user, other))
    }
}
