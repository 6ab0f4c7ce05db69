use std::ops::RangeInclusive;

use super::error::{DomainError, FieldErrors};

const USER_NAME_CHARS: RangeInclusive<usize> = 3..=64;
const DISPLAY_NAME_CHARS: RangeInclusive<usize> = 1..=128;
const PASSWORD_CHARS: RangeInclusive<usize> = 8..=128;

/// Автор публикации в том виде, в каком он виден снаружи: `{id, name, userName}`.
///
/// Хеш пароля и дата регистрации остаются в хранилище.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserSummary {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) username: String,
}

/// Нормализованная форма регистрации.
#[derive(Debug, Clone)]
pub(crate) struct Registration {
    pub(crate) user_name: String,
    pub(crate) name: String,
    pub(crate) password: String,
}

impl Registration {
    /// Логин и отображаемое имя обрезаются, пароль берётся как есть.
    /// Ошибки собираются сразу по всем полям.
    pub(crate) fn parse(user_name: &str, name: &str, password: String) -> Result<Self, DomainError> {
        let user_name = user_name.trim();
        let name = name.trim();

        let mut errors = FieldErrors::new();
        check_chars(&mut errors, "userName", user_name, USER_NAME_CHARS, "must be 3..64 chars");
        check_chars(&mut errors, "name", name, DISPLAY_NAME_CHARS, "must be 1..128 chars");
        check_chars(&mut errors, "password", &password, PASSWORD_CHARS, "must be 8..128 chars");
        if !errors.is_empty() {
            return Err(DomainError::InvalidFields(errors));
        }

        Ok(Self {
            user_name: user_name.to_string(),
            name: name.to_string(),
            password,
        })
    }
}

/// Попытка входа. Заведомо пустые значения отсекаются до обращения к хранилищу.
#[derive(Debug, Clone)]
pub(crate) struct LoginAttempt {
    pub(crate) user_name: String,
    pub(crate) password: String,
}

impl LoginAttempt {
    pub(crate) fn parse(user_name: &str, password: String) -> Result<Self, DomainError> {
        let user_name = user_name.trim();

        let mut errors = FieldErrors::new();
        check_chars(&mut errors, "userName", user_name, 1..=64, "must be 1..64 chars");
        if password.is_empty() {
            errors.add("password", "must not be empty");
        }
        if !errors.is_empty() {
            return Err(DomainError::InvalidFields(errors));
        }

        Ok(Self {
            user_name: user_name.to_string(),
            password,
        })
    }
}

fn check_chars(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    allowed: RangeInclusive<usize>,
    message: &'static str,
) {
    if !allowed.contains(&value.chars().count()) {
        errors.add(field, message);
    }
}
