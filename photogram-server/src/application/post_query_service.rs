use crate::data::photo_storage::PhotoStorage;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::photo::resolve_photo_file_name;
use crate::domain::post::{PostDetail, PostSummary};
use crate::domain::search::SearchTerm;

/// Тип содержимого, с которым отдаётся любая фотография.
///
/// Тип, сохранённый вместе с публикацией, здесь сознательно не используется.
pub(crate) const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub(crate) struct Photo {
    pub(crate) bytes: Vec<u8>,
    pub(crate) content_type: &'static str,
}

pub(crate) struct PostQueryService<R: PostRepository, S: PhotoStorage> {
    repo: R,
    photos: S,
}

impl<R: PostRepository, S: PhotoStorage> PostQueryService<R, S> {
    pub(crate) fn new(repo: R, photos: S) -> Self {
        Self { repo, photos }
    }

    pub(crate) async fn list_posts(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<PostSummary>, DomainError> {
        let filter = SearchTerm::parse(search);
        self.repo.list_posts(filter.as_ref()).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<PostDetail, DomainError> {
        self.repo
            .get_post_detail(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post with id {id} does not exist")))
    }

    pub(crate) async fn get_photo(&self, id: i64) -> Result<Photo, DomainError> {
        let post = self.repo.get_post(id).await?.ok_or_else(|| {
            DomainError::NotFound(format!(
                "cannot fetch the photo of post {id} because the post does not exist"
            ))
        })?;

        let file_name = resolve_photo_file_name(post.image_file_name.as_deref());
        let bytes = self.photos.load(file_name).await?;

        Ok(Photo {
            bytes,
            content_type: PHOTO_CONTENT_TYPE,
        })
    }
}
