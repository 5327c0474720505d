use crate::environment::Clock;
use crate::error::{EntityKind, FilmorateError, Result};
use crate::model::{User, UserId};
use crate::storage::Storage;
use crate::validation::{normalize_user, validate_user};
use std::sync::Arc;
use tracing::{debug, info};

/// Users and the friendship graph.
#[derive(Clone)]
pub struct UserService {
    storage: Storage,
    clock: Arc<dyn Clock>,
}

impl UserService {
    /// Create the service. `clock` decides what "today" is for birthdays.
    #[must_use]
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Validate and store a new user. A blank name is replaced by the login.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::Validation`] if the user breaks a rule.
    #[tracing::instrument(skip(self, user), fields(login = %user.login))]
    pub async fn add_user(&self, mut user: User) -> Result<User> {
        validate_user(&user, self.clock.today())?;

        user.id = None;
        let user = self.storage.users.add(normalize_user(user)).await?;

        metrics::counter!("filmorate.users.created").increment(1);
        info!(user_id = ?user.id, "User added");
        Ok(user)
    }

    /// Replace an existing user.
    ///
    /// # Errors
    ///
    /// - [`FilmorateError::Validation`] if the id is missing or the user breaks a rule
    /// - [`FilmorateError::NotFound`] if no user has this id
    #[tracing::instrument(skip(self, user), fields(user_id = ?user.id))]
    pub async fn update_user(&self, user: User) -> Result<User> {
        let id = user
            .id
            .ok_or_else(|| FilmorateError::validation("Не указан id пользователя"))?;
        self.ensure_user(id).await?;
        validate_user(&user, self.clock.today())?;

        let user = self
            .storage
            .users
            .update(id, normalize_user(user))
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::User, id))?;

        info!("User updated");
        Ok(user)
    }

    /// All users ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::Storage`] if the backend fails.
    pub async fn users(&self) -> Result<Vec<User>> {
        self.storage.users.list().await
    }

    /// One user.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown id.
    pub async fn user(&self, id: UserId) -> Result<User> {
        self.storage
            .users
            .get(id)
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::User, id))
    }

    /// Delete a user with all of its friendships and likes.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn remove_user(&self, id: UserId) -> Result<User> {
        let user = self
            .storage
            .users
            .remove(id)
            .await?
            .ok_or_else(|| FilmorateError::not_found(EntityKind::User, id))?;

        info!("User removed");
        Ok(user)
    }

    /// Make two users friends. The link is visible from both sides at once.
    ///
    /// # Errors
    ///
    /// - [`FilmorateError::NotFound`] if either user is unknown
    /// - [`FilmorateError::Validation`] if both ids are the same
    /// - [`FilmorateError::Conflict`] if the users are already friends
    #[tracing::instrument(skip(self))]
    pub async fn add_friend(&self, user: UserId, friend: UserId) -> Result<()> {
        self.ensure_user(user).await?;
        self.ensure_user(friend).await?;
        if user == friend {
            return Err(FilmorateError::validation(
                "Пользователь не может добавить в друзья самого себя",
            ));
        }

        if !self.storage.friends.add_friend(user, friend).await? {
            debug!("Duplicate friendship rejected");
            return Err(FilmorateError::conflict(
                "Пользователи уже являются друзьями",
            ));
        }

        metrics::counter!("filmorate.friendships", "op" => "add").increment(1);
        info!("Friendship added");
        Ok(())
    }

    /// Break a friendship on both sides.
    ///
    /// # Errors
    ///
    /// - [`FilmorateError::NotFound`] if either user is unknown
    /// - [`FilmorateError::Conflict`] if the users are not friends
    #[tracing::instrument(skip(self))]
    pub async fn remove_friend(&self, user: UserId, friend: UserId) -> Result<()> {
        self.ensure_user(user).await?;
        self.ensure_user(friend).await?;

        if !self.storage.friends.remove_friend(user, friend).await? {
            debug!("Missing friendship rejected");
            return Err(FilmorateError::conflict(
                "Пользователи не являются друзьями",
            ));
        }

        metrics::counter!("filmorate.friendships", "op" => "remove").increment(1);
        info!("Friendship removed");
        Ok(())
    }

    /// Friends of a user, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] for an unknown user.
    pub async fn friends(&self, user: UserId) -> Result<Vec<User>> {
        self.ensure_user(user).await?;
        self.storage.friends.friends(user).await
    }

    /// Users who are friends of both `user` and `other`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`FilmorateError::NotFound`] if either user is unknown.
    pub async fn common_friends(&self, user: UserId, other: UserId) -> Result<Vec<User>> {
        self.ensure_user(user).await?;
        self.ensure_user(other).await?;
        self.storage.friends.common_friends(user, other).await
    }

    async fn ensure_user(&self, id: UserId) -> Result<()> {
        if self.storage.users.exists(id).await? {
            Ok(())
        } else {
            Err(FilmorateError::not_found(EntityKind::User, id))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStorage;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> UserService {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        UserService::new(InMemoryStorage::new().into_storage(), Arc::new(clock))
    }

    fn user(login: &str) -> User {
        User::new(format!("{login}@example.com"), login, "", date(1990, 5, 15))
    }

    async fn add(service: &UserService, login: &str) -> UserId {
        service.add_user(user(login)).await.unwrap().id.unwrap()
    }

    fn ids(users: &[User]) -> Vec<UserId> {
        users.iter().filter_map(|u| u.id).collect()
    }

    #[tokio::test]
    async fn blank_name_becomes_login() {
        let service = service();
        let stored = service.add_user(user("alice")).await.unwrap();
        assert_eq!(stored.name, "alice");
        assert_eq!(stored.id, Some(UserId::new(1)));
    }

    #[tokio::test]
    async fn birthday_is_checked_against_the_clock() {
        let service = service();
        let mut u = user("future");
        u.birthday = date(2024, 6, 2);
        assert!(matches!(
            service.add_user(u).await.unwrap_err(),
            FilmorateError::Validation(_)
        ));

        let mut u = user("today");
        u.birthday = date(2024, 6, 1);
        assert!(service.add_user(u).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_friend_requests_link_once() {
        let service = service();
        let a = add(&service, "a").await;
        let b = add(&service, "b").await;

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                let (x, y) = if i % 2 == 0 { (a, b) } else { (b, a) };
                tokio::spawn(async move { service.add_friend(x, y).await })
            })
            .collect();
        let mut ok = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => ok += 1,
                Err(err) => assert!(matches!(err, FilmorateError::Conflict(_))),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(ids(&service.friends(a).await.unwrap()), vec![b]);
    }

    #[tokio::test]
    async fn friendship_is_visible_from_both_sides() {
        let service = service();
        let a = add(&service, "a").await;
        let b = add(&service, "b").await;

        service.add_friend(a, b).await.unwrap();
        assert_eq!(ids(&service.friends(a).await.unwrap()), vec![b]);
        assert_eq!(ids(&service.friends(b).await.unwrap()), vec![a]);

        service.remove_friend(b, a).await.unwrap();
        assert!(service.friends(a).await.unwrap().is_empty());
        assert!(service.friends(b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_add_friend_conflicts() {
        let service = service();
        let a = add(&service, "a").await;
        let b = add(&service, "b").await;

        service.add_friend(a, b).await.unwrap();
        assert_eq!(
            service.add_friend(a, b).await.unwrap_err(),
            FilmorateError::conflict("Пользователи уже являются друзьями")
        );
        assert_eq!(
            service.add_friend(b, a).await.unwrap_err(),
            FilmorateError::conflict("Пользователи уже являются друзьями")
        );
    }

    #[tokio::test]
    async fn removing_a_missing_friendship_conflicts() {
        let service = service();
        let a = add(&service, "a").await;
        let b = add(&service, "b").await;

        assert_eq!(
            service.remove_friend(a, b).await.unwrap_err(),
            FilmorateError::conflict("Пользователи не являются друзьями")
        );
    }

    #[tokio::test]
    async fn self_friendship_is_refused() {
        let service = service();
        let a = add(&service, "a").await;
        assert!(matches!(
            service.add_friend(a, a).await.unwrap_err(),
            FilmorateError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn unknown_users_are_not_found() {
        let service = service();
        let a = add(&service, "a").await;
        let ghost = UserId::new(99);

        assert!(service.add_friend(a, ghost).await.unwrap_err().is_not_found());
        assert!(service.add_friend(ghost, a).await.unwrap_err().is_not_found());
        assert!(service.friends(ghost).await.unwrap_err().is_not_found());
        assert!(service.common_friends(a, ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn common_friends_is_symmetric() {
        let service = service();
        let a = add(&service, "a").await;
        let b = add(&service, "b").await;
        let c = add(&service, "c").await;

        service.add_friend(a, b).await.unwrap();
        service.add_friend(a, c).await.unwrap();
        service.add_friend(b, c).await.unwrap();

        let ab = service.common_friends(a, b).await.unwrap();
        let ba = service.common_friends(b, a).await.unwrap();
        assert_eq!(ids(&ab), vec![c]);
        assert_eq!(ab, ba);
    }

    #[tokio::test]
    async fn update_checks_existence_before_validation() {
        let service = service();
        let ghost = User::new("bad", "has space", "", date(2999, 1, 1)).with_id(UserId::new(5));
        assert!(service.update_user(ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_normalizes_name() {
        let service = service();
        let id = add(&service, "alice").await;

        let renamed = User::new("new@example.com", "alice2", " ", date(1991, 1, 1)).with_id(id);
        let updated = service.update_user(renamed).await.unwrap();
        assert_eq!(updated.name, "alice2");
        assert_eq!(service.user(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn removing_a_user_unlinks_friends() {
        let service = service();
        let a = add(&service, "a").await;
        let b = add(&service, "b").await;
        service.add_friend(a, b).await.unwrap();

        let removed = service.remove_user(a).await.unwrap();
        assert_eq!(removed.id, Some(a));
        assert!(service.friends(b).await.unwrap().is_empty());
        assert!(service.user(a).await.unwrap_err().is_not_found());
    }
}
