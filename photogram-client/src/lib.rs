//! Клиентская библиотека для работы с photogram-server по HTTP.
//!
//! Клиент хранит JWT-токен после `register`/`login` и прикладывает его к
//! созданию публикаций; сервер по токену определяет автора.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{PhotogramClientError, PhotogramClientResult};
pub use models::{
    AuthResponse, Comment, CreatedPost, PhotoUpload, Post, PostDetail, PostSummary, User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент REST API ленты фотографий.
pub struct PhotogramClient {
    http: HttpClient,
    token: Option<String>,
}

impl PhotogramClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> PhotogramClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn register(
        &mut self,
        user_name: &str,
        name: &str,
        password: &str,
    ) -> PhotogramClientResult<AuthResponse> {
        let result = self.http.register(user_name, name, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn login(
        &mut self,
        user_name: &str,
        password: &str,
    ) -> PhotogramClientResult<AuthResponse> {
        let result = self.http.login(user_name, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Завершает сессию и забывает токен.
    pub async fn logout(&mut self) -> PhotogramClientResult<()> {
        self.http.logout(self.token.as_deref()).await?;
        self.token = None;
        Ok(())
    }

    /// Лента публикаций. `search` ищет подстроку в имени автора или подписи без учёта регистра.
    pub async fn list_posts(&self, search: Option<&str>) -> PhotogramClientResult<Vec<PostSummary>> {
        self.http.list_posts(search).await
    }

    /// Возвращает публикацию с комментариями.
    pub async fn get_post(&self, id: i64) -> PhotogramClientResult<PostDetail> {
        self.http.get_post(id).await
    }

    /// Возвращает байты фотографии публикации (всегда `image/jpeg`).
    pub async fn get_photo(&self, id: i64) -> PhotogramClientResult<Vec<u8>> {
        self.http.get_photo(id).await
    }

    /// Создаёт публикацию.
    ///
    /// Без токена сервер отклонит запрос с ошибкой валидации.
    pub async fn create_post(
        &self,
        caption: Option<&str>,
        photo: PhotoUpload,
    ) -> PhotogramClientResult<CreatedPost> {
        self.http
            .create_post(self.token.as_deref(), caption, photo)
            .await
    }

    /// Заменяет запись публикации целиком.
    pub async fn update_post(&self, post: &Post) -> PhotogramClientResult<()> {
        self.http.update_post(post).await
    }

    /// Удаляет публикацию и возвращает удалённую запись.
    pub async fn delete_post(&self, id: i64) -> PhotogramClientResult<Post> {
        self.http.delete_post(id).await
    }
}
