use crate::models::{ErrorBody, PostSummary, User};

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:8080",
};

pub(crate) fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn photo_url(post_id: i64) -> String {
    endpoint(&format!("/api/posts/{post_id}/foto"))
}

/// Пустая строка поиска означает всю ленту.
pub(crate) fn search_term(raw: &str) -> Option<String> {
    let term = raw.trim();
    (!term.is_empty()).then(|| term.to_string())
}

pub(crate) fn caption_text(caption: Option<&str>) -> String {
    match caption.map(str::trim) {
        Some(caption) if !caption.is_empty() => caption.to_string(),
        _ => "(без подписи)".to_string(),
    }
}

pub(crate) fn is_own_post(user: Option<&User>, post: &PostSummary) -> bool {
    user.is_some_and(|user| user.id == post.user.id)
}

pub(crate) fn error_message(status: u16, body: &str) -> String {
    let fallback = match status {
        400 => "Некорректный запрос".to_string(),
        401 => "Неверный логин или пароль".to_string(),
        404 => "Публикация не найдена".to_string(),
        409 => "Пользователь с таким логином уже существует".to_string(),
        500..=599 => "Ошибка сервера".to_string(),
        _ => format!("HTTP ошибка {status}"),
    };

    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return fallback;
    };

    let mut message = parsed.mensagem.unwrap_or(fallback);
    for (field, messages) in parsed.errors {
        message.push_str(&format!("; {field}: {}", messages.join(", ")));
    }
    message
}

pub(crate) fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

pub(crate) fn parse_user(raw: &str) -> Option<User> {
    serde_json::from_str::<User>(raw).ok()
}
