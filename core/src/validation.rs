//! Validation layer.
//!
//! Pure checks run by the services before any storage mutation. Each failed
//! rule yields [`FilmorateError::Validation`] with a message fit for the client;
//! nothing is written when a check fails.

use crate::error::{FilmorateError, Result};
use crate::model::{Film, User};
use chrono::NaiveDate;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// The earliest accepted release date: the first public film screening.
#[must_use]
pub fn cinema_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).unwrap_or(NaiveDate::MIN)
}

/// Check a film against the creation/update rules.
///
/// # Errors
///
/// Returns [`FilmorateError::Validation`] naming the first rule the film breaks.
pub fn validate_film(film: &Film) -> Result<()> {
    if film.name.trim().is_empty() {
        return Err(FilmorateError::validation("Название не может быть пустым"));
    }
    if film.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(FilmorateError::validation(
            "Максимальная длина описания — 200 символов",
        ));
    }
    if film.release_date < cinema_epoch() {
        return Err(FilmorateError::validation(
            "Дата релиза не может быть до 28.12.1895",
        ));
    }
    if film.duration <= 0 {
        return Err(FilmorateError::validation(
            "Продолжительность фильма должна быть положительной",
        ));
    }
    if film.rate < 0 {
        return Err(FilmorateError::validation(
            "Рейтинг не может быть отрицательным",
        ));
    }
    Ok(())
}

/// Check a user against the creation/update rules.
///
/// `today` comes from the injected clock so the birthday rule is deterministic
/// under test.
///
/// # Errors
///
/// Returns [`FilmorateError::Validation`] naming the first rule the user breaks.
pub fn validate_user(user: &User, today: NaiveDate) -> Result<()> {
    if user.email.trim().is_empty() || !user.email.contains('@') {
        return Err(FilmorateError::validation(
            "Электронная почта не может быть пустой и должна содержать символ @",
        ));
    }
    if user.login.trim().is_empty() {
        return Err(FilmorateError::validation("Логин не может быть пустым"));
    }
    if user.login.chars().any(char::is_whitespace) {
        return Err(FilmorateError::validation(
            "Логин не может содержать пробелы",
        ));
    }
    if user.birthday > today {
        return Err(FilmorateError::validation(
            "Дата рождения не может быть в будущем",
        ));
    }
    Ok(())
}

/// Fill in derived fields: a blank name becomes the login.
#[must_use]
pub fn normalize_user(mut user: User) -> User {
    if user.name.trim().is_empty() {
        user.name.clone_from(&user.login);
    }
    user
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::model::Mpa;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn film() -> Film {
        Film::new("Film", "A film", date(2000, 1, 1), 100, Mpa::reference(1))
    }

    fn user() -> User {
        User::new("alice@example.com", "alice", "Alice", date(1990, 5, 15))
    }

    fn reason(result: Result<()>) -> String {
        match result {
            Err(FilmorateError::Validation(reason)) => reason,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_film_passes() {
        assert!(validate_film(&film()).is_ok());
    }

    #[test]
    fn blank_film_name_is_rejected() {
        let mut f = film();
        f.name = "   ".to_string();
        assert_eq!(reason(validate_film(&f)), "Название не может быть пустым");
    }

    #[test]
    fn description_limit_counts_characters() {
        let mut f = film();
        f.description = "я".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_film(&f).is_ok());

        f.description.push('я');
        assert!(validate_film(&f).is_err());
    }

    #[test]
    fn release_date_boundary() {
        let mut f = film();
        f.release_date = cinema_epoch();
        assert!(validate_film(&f).is_ok());

        f.release_date = date(1895, 12, 27);
        assert_eq!(
            reason(validate_film(&f)),
            "Дата релиза не может быть до 28.12.1895"
        );
    }

    #[test]
    fn duration_must_be_positive() {
        let mut f = film();
        f.duration = 0;
        assert!(validate_film(&f).is_err());
        f.duration = -5;
        assert!(validate_film(&f).is_err());
    }

    #[test]
    fn negative_rate_is_rejected() {
        let f = film().with_rate(-1);
        assert!(validate_film(&f).is_err());
    }

    #[test]
    fn valid_user_passes() {
        assert!(validate_user(&user(), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn email_needs_at_sign() {
        let mut u = user();
        u.email = "alice.example.com".to_string();
        assert!(validate_user(&u, date(2024, 1, 1)).is_err());
        u.email = String::new();
        assert!(validate_user(&u, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn login_with_space_is_rejected() {
        let mut u = user();
        u.login = "ali ce".to_string();
        assert_eq!(
            reason(validate_user(&u, date(2024, 1, 1))),
            "Логин не может содержать пробелы"
        );
    }

    #[test]
    fn birthday_today_is_allowed_tomorrow_is_not() {
        let today = date(2024, 1, 1);
        let mut u = user();
        u.birthday = today;
        assert!(validate_user(&u, today).is_ok());
        u.birthday = date(2024, 1, 2);
        assert_eq!(
            reason(validate_user(&u, today)),
            "Дата рождения не может быть в будущем"
        );
    }

    #[test]
    fn blank_name_defaults_to_login() {
        let mut u = user();
        u.name = " ".to_string();
        assert_eq!(normalize_user(u).name, "alice");
        assert_eq!(normalize_user(user()).name, "Alice");
    }

    proptest! {
        #[test]
        fn films_before_epoch_always_fail(days in 1i64..100_000) {
            let mut f = film();
            f.release_date = cinema_epoch() - chrono::Duration::days(days);
            prop_assert!(validate_film(&f).is_err());
        }

        #[test]
        fn logins_without_whitespace_pass(login in "[a-zA-Z0-9_]{1,20}") {
            let mut u = user();
            u.login = login;
            prop_assert!(validate_user(&u, date(2024, 1, 1)).is_ok());
        }

        #[test]
        fn normalized_name_is_never_blank(login in "[a-z]{1,12}", name in "[ ]{0,3}") {
            let mut u = user();
            u.login = login.clone();
            u.name = name;
            prop_assert_eq!(normalize_user(u).name, login);
        }
    }
}
