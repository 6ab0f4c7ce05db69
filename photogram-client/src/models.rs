use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Отображаемое имя.
    pub name: String,
    /// Логин.
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Элемент ленты.
pub struct PostSummary {
    /// Идентификатор публикации.
    pub id: i64,
    /// Подпись.
    pub caption: Option<String>,
    /// Дата и время публикации (UTC).
    pub posted_at: DateTime<Utc>,
    /// Автор.
    pub user: User,
    /// Количество лайков.
    pub likes: i64,
    /// Количество комментариев.
    pub comments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Комментарий к публикации.
pub struct Comment {
    /// Имя автора комментария.
    pub name: String,
    /// Дата и время комментария (UTC).
    pub posted_at: DateTime<Utc>,
    /// Текст.
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Публикация вместе с комментариями.
pub struct PostDetail {
    /// Идентификатор публикации.
    pub id: i64,
    /// Подпись.
    pub caption: Option<String>,
    /// Дата и время публикации (UTC).
    pub posted_at: DateTime<Utc>,
    /// Автор.
    pub user: User,
    /// Количество лайков.
    pub likes: i64,
    /// Все комментарии.
    #[serde(rename = "listaDeComentarios")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Запись публикации целиком; используется для замены и возвращается при удалении.
pub struct Post {
    /// Идентификатор публикации.
    pub id: i64,
    /// Подпись.
    pub caption: Option<String>,
    /// Дата и время публикации (UTC).
    pub posted_at: DateTime<Utc>,
    /// Идентификатор автора.
    pub user_id: i64,
    /// Имя файла фотографии.
    pub image_file_name: Option<String>,
    /// MIME-тип, указанный при загрузке.
    pub image_content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Ответ на создание публикации.
pub struct CreatedPost {
    /// Идентификатор новой публикации.
    pub id: i64,
    /// Идентификатор автора.
    pub user_id: i64,
    /// Подпись.
    pub caption: Option<String>,
    /// Сгенерированное имя файла.
    pub image_file_name: Option<String>,
    /// MIME-тип, указанный при загрузке.
    pub image_content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone)]
/// Фотография для загрузки.
pub struct PhotoUpload {
    /// Исходное имя файла; сервер берёт из него расширение.
    pub file_name: String,
    /// MIME-тип; сервер принимает только JPEG.
    pub content_type: String,
    /// Содержимое файла.
    pub bytes: Vec<u8>,
}
