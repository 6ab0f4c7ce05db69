use tracing::{info, warn};

use crate::data::photo_storage::PhotoStorage;
use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::photo::generate_photo_file_name;
use crate::domain::post::{CreatePostRequest, Post, ReplacePostRequest};

pub(crate) struct PostCommandService<R: PostRepository, S: PhotoStorage> {
    repo: R,
    photos: S,
}

impl<R: PostRepository, S: PhotoStorage> PostCommandService<R, S> {
    pub(crate) fn new(repo: R, photos: S) -> Self {
        Self { repo, photos }
    }

    /// Сначала валидация, затем файл, затем запись в БД.
    /// Если вставка упадёт, файл останется на диске.
    pub(crate) async fn create_post(&self, req: CreatePostRequest) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let file_name = generate_photo_file_name(req.photo.original_name.as_deref());
        self.photos.save(&file_name, &req.photo.bytes).await?;

        let new_post = NewPost {
            caption: req.caption,
            user_id: req.author_id,
            image_file_name: file_name,
            image_content_type: req.photo.content_type,
        };
        let post = self.repo.create_post(new_post).await?;

        info!(post_id = post.id, user_id = post.user_id, "post created");
        Ok(post)
    }

    pub(crate) async fn replace_post(
        &self,
        path_id: i64,
        req: ReplacePostRequest,
    ) -> Result<(), DomainError> {
        let post = req.validate(path_id)?;

        match self.repo.replace_post(post).await {
            Ok(()) => Ok(()),
            Err(DomainError::ConcurrencyConflict(reason)) => {
                if !self.repo.post_exists(path_id).await? {
                    return Err(DomainError::NotFound(format!(
                        "post with id {path_id} does not exist"
                    )));
                }
                warn!(post_id = path_id, %reason, "concurrent modification");
                Err(DomainError::ConcurrencyConflict(reason))
            }
            Err(err) => Err(err),
        }
    }

    /// Удаляет только запись; файл фотографии не трогаем.
    pub(crate) async fn delete_post(&self, id: i64) -> Result<Post, DomainError> {
        let post = self
            .repo
            .delete_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post with id {id} does not exist")))?;

        info!(post_id = id, "post deleted");
        Ok(post)
    }
}
