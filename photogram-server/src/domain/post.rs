use chrono::{DateTime, Utc};

use super::error::{DomainError, FieldErrors};
use super::photo::{UploadedPhoto, validate_photo};
use super::user::UserSummary;

/// Предел длины подписи в символах, общий для создания и замены.
pub(crate) const MAX_CAPTION_CHARS: usize = 2200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) user_id: i64,
    pub(crate) image_file_name: Option<String>,
    pub(crate) image_content_type: Option<String>,
}

impl Post {
    pub(crate) fn new(
        id: i64,
        caption: Option<String>,
        posted_at: DateTime<Utc>,
        user_id: i64,
        image_file_name: Option<String>,
        image_content_type: Option<String>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("userId", user_id)?;

        Ok(Self {
            id,
            caption: normalize_caption(caption),
            posted_at,
            user_id,
            image_file_name,
            image_content_type,
        })
    }
}

/// Строка ленты: публикация с автором и счётчиками, без обратных ссылок.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostSummary {
    pub(crate) id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) user: UserSummary,
    pub(crate) likes: i64,
    pub(crate) comments: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostDetail {
    pub(crate) id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) user: UserSummary,
    pub(crate) likes: i64,
    pub(crate) comments: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommentView {
    pub(crate) author_name: String,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePostRequest {
    pub(crate) caption: Option<String>,
    pub(crate) photo: Option<UploadedPhoto>,
    pub(crate) author_id: Option<i64>,
}

/// Проверенный запрос на создание: фото и автор гарантированно есть.
#[derive(Debug, Clone)]
pub(crate) struct ValidCreatePost {
    pub(crate) caption: Option<String>,
    pub(crate) photo: UploadedPhoto,
    pub(crate) author_id: i64,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<ValidCreatePost, DomainError> {
        let mut errors = FieldErrors::new();

        if self.author_id.is_none() {
            errors.add("userId", "not authenticated");
        }
        validate_photo(self.photo.as_ref(), &mut errors);
        let caption = normalize_caption(self.caption);
        if caption_too_long(caption.as_deref()) {
            errors.add("caption", "must be at most 2200 chars");
        }

        match (self.photo, self.author_id) {
            (Some(photo), Some(author_id)) if errors.is_empty() => Ok(ValidCreatePost {
                caption,
                photo,
                author_id,
            }),
            _ => Err(DomainError::InvalidFields(errors)),
        }
    }
}

/// Полная замена записи публикации (PUT).
#[derive(Debug, Clone)]
pub(crate) struct ReplacePostRequest {
    pub(crate) id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) user_id: i64,
    pub(crate) image_file_name: Option<String>,
    pub(crate) image_content_type: Option<String>,
}

impl ReplacePostRequest {
    pub(crate) fn validate(self, path_id: i64) -> Result<Post, DomainError> {
        if self.id != path_id {
            return Err(DomainError::Validation {
                field: "id",
                message: "must match the id in the path",
            });
        }
        if caption_too_long(self.caption.as_deref().map(str::trim)) {
            return Err(DomainError::Validation {
                field: "caption",
                message: "must be at most 2200 chars",
            });
        }

        Post::new(
            self.id,
            self.caption,
            self.posted_at,
            self.user_id,
            self.image_file_name,
            self.image_content_type,
        )
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn caption_too_long(caption: Option<&str>) -> bool {
    caption.is_some_and(|caption| caption.chars().count() > MAX_CAPTION_CHARS)
}

fn normalize_caption(caption: Option<String>) -> Option<String> {
    caption
        .map(|caption| caption.trim().to_string())
        .filter(|caption| !caption.is_empty())
}
