use web_sys::Storage;

use crate::helpers::{parse_token, parse_user};
use crate::models::User;

const TOKEN_KEY: &str = "photogram_token";
const USER_KEY: &str = "photogram_user";

fn local_storage() -> Result<Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())
}

fn read_item(key: &str) -> Option<String> {
    local_storage().ok()?.get_item(key).ok()?
}

pub(crate) fn load_token() -> Option<String> {
    parse_token(&read_item(TOKEN_KEY)?)
}

pub(crate) fn load_user() -> Option<User> {
    parse_user(&read_item(USER_KEY)?)
}

/// Токен и пользователь сохраняются вместе; баннер приветствия берёт имя отсюда.
pub(crate) fn save_session(token: &str, user: &User) -> Result<(), String> {
    let storage = local_storage()?;
    let raw = serde_json::to_string(user).map_err(|_| "failed to serialize user".to_string())?;

    storage
        .set_item(TOKEN_KEY, token)
        .map_err(|_| "failed to save token".to_string())?;
    storage
        .set_item(USER_KEY, &raw)
        .map_err(|_| "failed to save user".to_string())
}

pub(crate) fn clear_session() -> Result<(), String> {
    let storage = local_storage()?;
    storage
        .remove_item(TOKEN_KEY)
        .map_err(|_| "failed to clear token".to_string())?;
    storage
        .remove_item(USER_KEY)
        .map_err(|_| "failed to clear user".to_string())
}
