use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostDetail, PostSummary};
use crate::domain::search::SearchTerm;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) caption: Option<String>,
    pub(crate) user_id: i64,
    pub(crate) image_file_name: String,
    pub(crate) image_content_type: Option<String>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    /// `None` означает выборку без фильтра; порядок определяет хранилище.
    async fn list_posts(&self, filter: Option<&SearchTerm>) -> Result<Vec<PostSummary>, DomainError>;
    async fn get_post_detail(&self, id: i64) -> Result<Option<PostDetail>, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn post_exists(&self, id: i64) -> Result<bool, DomainError>;
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    /// Перезаписывает все поля. `ConcurrencyConflict`, если ни одна строка не изменена.
    async fn replace_post(&self, post: Post) -> Result<(), DomainError>;
    /// Удаляет строку и возвращает её одним запросом; `None`, если удалять нечего.
    async fn delete_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
}

#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn list_posts(&self, filter: Option<&SearchTerm>) -> Result<Vec<PostSummary>, DomainError> {
        (**self).list_posts(filter).await
    }

    async fn get_post_detail(&self, id: i64) -> Result<Option<PostDetail>, DomainError> {
        (**self).get_post_detail(id).await
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        (**self).get_post(id).await
    }

    async fn post_exists(&self, id: i64) -> Result<bool, DomainError> {
        (**self).post_exists(id).await
    }

    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        (**self).create_post(input).await
    }

    async fn replace_post(&self, post: Post) -> Result<(), DomainError> {
        (**self).replace_post(post).await
    }

    async fn delete_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        (**self).delete_post(id).await
    }
}
