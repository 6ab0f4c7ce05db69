use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::photo::UploadedPhoto;
use crate::domain::post::{
    CommentView, CreatePostRequest, Post, PostDetail, PostSummary, ReplacePostRequest,
};
use crate::domain::user::UserSummary;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub(crate) struct ListPostsQuery {
    pub(crate) pesquisa: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) user_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostSummaryDto {
    pub(crate) id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) user: UserDto,
    pub(crate) likes: i64,
    pub(crate) comments: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentDto {
    pub(crate) name: String,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) text: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDetailDto {
    pub(crate) id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) user: UserDto,
    pub(crate) likes: i64,
    pub(crate) lista_de_comentarios: Vec<CommentDto>,
}

/// Полная запись публикации, как она хранится.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    pub(crate) user_id: i64,
    pub(crate) image_file_name: Option<String>,
    pub(crate) image_content_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedPostDto {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) caption: Option<String>,
    pub(crate) image_file_name: Option<String>,
    pub(crate) image_content_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostPayloadDto {
    #[validate(range(min = 1))]
    pub(crate) id: i64,
    #[validate(length(max = 2200))]
    pub(crate) caption: Option<String>,
    pub(crate) posted_at: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub(crate) user_id: i64,
    #[validate(length(max = 255))]
    pub(crate) image_file_name: Option<String>,
    #[validate(length(max = 255))]
    pub(crate) image_content_type: Option<String>,
}

/// Схема multipart-формы создания публикации, только для документации.
#[allow(dead_code)]
#[derive(ToSchema)]
pub(crate) struct CreatePostForm {
    /// Подпись; принимается и под именем `publicacao`.
    caption: Option<String>,
    /// JPEG; принимается и под именем `foto`.
    #[schema(value_type = String, format = Binary)]
    fotografia: Vec<u8>,
}

impl From<UserSummary> for UserDto {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            name: user.name,
            user_name: user.username,
        }
    }
}

impl From<PostSummary> for PostSummaryDto {
    fn from(post: PostSummary) -> Self {
        Self {
            id: post.id,
            caption: post.caption,
            posted_at: post.posted_at,
            user: post.user.into(),
            likes: post.likes,
            comments: post.comments,
        }
    }
}

impl From<CommentView> for CommentDto {
    fn from(comment: CommentView) -> Self {
        Self {
            name: comment.author_name,
            posted_at: comment.posted_at,
            text: comment.text,
        }
    }
}

impl From<PostDetail> for PostDetailDto {
    fn from(post: PostDetail) -> Self {
        Self {
            id: post.id,
            caption: post.caption,
            posted_at: post.posted_at,
            user: post.user.into(),
            likes: post.likes,
            lista_de_comentarios: post.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            caption: post.caption,
            posted_at: post.posted_at,
            user_id: post.user_id,
            image_file_name: post.image_file_name,
            image_content_type: post.image_content_type,
        }
    }
}

impl From<Post> for CreatedPostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            caption: post.caption,
            image_file_name: post.image_file_name,
            image_content_type: post.image_content_type,
        }
    }
}

impl From<PostPayloadDto> for ReplacePostRequest {
    fn from(dto: PostPayloadDto) -> Self {
        Self {
            id: dto.id,
            caption: dto.caption,
            posted_at: dto.posted_at,
            user_id: dto.user_id,
            image_file_name: dto.image_file_name,
            image_content_type: dto.image_content_type,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("pesquisa" = Option<String>, Query, description = "Case-insensitive substring of the author name or caption")
    ),
    responses(
        (status = 200, description = "Posts listed", body = [PostSummaryDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<Json<Vec<PostSummaryDto>>> {
    let posts = state
        .post_queries
        .list_posts(query.pesquisa.as_deref())
        .await?;

    Ok(Json(posts.into_iter().map(PostSummaryDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDetailDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDetailDto>> {
    let post = state.post_queries.get_post(id).await?;
    Ok(Json(PostDetailDto::from(post)))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/foto",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Photo bytes", content_type = "image/jpeg", body = Vec<u8>),
        (status = 404, description = "Post or photo file not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let photo = state.post_queries.get_photo(id).await?;
    Ok(([(header::CONTENT_TYPE, photo.content_type)], photo.bytes))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        (),
        ("bearer_auth" = [])
    ),
    request_body(content = CreatePostForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created", body = CreatedPostDto,
            headers(("Location" = String, description = "Address of the new post"))),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: Option<AuthenticatedUser>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_create_form(multipart).await?;
    let req = CreatePostRequest {
        caption: form.caption,
        photo: form.photo,
        author_id: auth.map(|user| user.user_id),
    };

    let post = state.post_commands.create_post(req).await?;
    let location = format!("/api/posts/{}", post.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreatedPostDto::from(post)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PostPayloadDto,
    responses(
        (status = 204, description = "Post replaced"),
        (status = 400, description = "Validation error or id mismatch"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<PostPayloadDto>,
) -> AppResult<StatusCode> {
    dto.validate()?;
    state.post_commands.replace_post(id, dto.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = PostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let post = state.post_commands.delete_post(id).await?;
    Ok(Json(PostDto::from(post)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Caption,
    Photo,
}

impl FormField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "caption" | "publicacao" => Some(Self::Caption),
            "fotografia" | "foto" => Some(Self::Photo),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct CreateForm {
    caption: Option<String>,
    photo: Option<UploadedPhoto>,
}

/// Неизвестные поля пропускаются. Пустой файловый input считается отсутствующей фотографией.
async fn read_create_form(mut multipart: Multipart) -> AppResult<CreateForm> {
    let mut form = CreateForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(kind) = field.name().and_then(FormField::from_name) else {
            continue;
        };

        match kind {
            FormField::Caption => {
                let text = field.text().await?;
                form.caption = Some(text);
            }
            FormField::Photo => {
                let original_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                let photo = UploadedPhoto {
                    original_name,
                    content_type,
                    bytes: bytes.to_vec(),
                };
                form.photo = (!is_empty_upload(&photo)).then_some(photo);
            }
        }
    }

    Ok(form)
}

fn is_empty_upload(photo: &UploadedPhoto) -> bool {
    photo.bytes.is_empty() && photo.original_name.as_deref().is_none_or(str::is_empty)
}
