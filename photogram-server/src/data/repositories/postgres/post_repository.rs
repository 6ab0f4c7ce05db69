use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CommentView, Post, PostDetail, PostSummary};
use crate::domain::search::SearchTerm;
use crate::domain::user::UserSummary;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    caption: Option<String>,
    posted_at: DateTime<Utc>,
    user_id: i64,
    image_file_name: Option<String>,
    image_content_type: Option<String>,
}

#[derive(FromRow)]
struct PostSummaryRow {
    id: i64,
    caption: Option<String>,
    posted_at: DateTime<Utc>,
    user_id: i64,
    user_name: String,
    user_username: String,
    likes: i64,
    comments: i64,
}

#[derive(FromRow)]
struct CommentRow {
    author_name: String,
    posted_at: DateTime<Utc>,
    text: String,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_posts(
        &self,
        filter: Option<&SearchTerm>,
    ) -> Result<Vec<PostSummary>, DomainError> {
        let rows = sqlx::query_as::<_, PostSummaryRow>(
            r#"
            SELECT
                p.id,
                p.caption,
                p.posted_at,
                u.id AS user_id,
                u.name AS user_name,
                u.username AS user_username,
                (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE $1::TEXT IS NULL
               OR STRPOS(LOWER(u.name), $1) > 0
               OR STRPOS(LOWER(p.caption), $1) > 0
            "#,
        )
        .bind(filter.map(SearchTerm::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(rows.into_iter().map(map_row_to_summary).collect())
    }

    async fn get_post_detail(&self, id: i64) -> Result<Option<PostDetail>, DomainError> {
        let row = sqlx::query_as::<_, PostSummaryRow>(
            r#"
            SELECT
                p.id,
                p.caption,
                p.posted_at,
                u.id AS user_id,
                u.name AS user_name,
                u.username AS user_username,
                (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                u.name AS author_name,
                c.posted_at,
                c.text
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        let summary = map_row_to_summary(row);
        Ok(Some(PostDetail {
            id: summary.id,
            caption: summary.caption,
            posted_at: summary.posted_at,
            user: summary.user,
            likes: summary.likes,
            comments: comments
                .into_iter()
                .map(|c| CommentView {
                    author_name: c.author_name,
                    posted_at: c.posted_at,
                    text: c.text,
                })
                .collect(),
        }))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
            id,
            caption,
            posted_at,
            user_id,
            image_file_name,
            image_content_type
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn post_exists(&self, id: i64) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(exists)
    }

    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (caption, user_id, image_file_name, image_content_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, caption, posted_at, user_id, image_file_name, image_content_type
            "#,
        )
        .bind(input.caption)
        .bind(input.user_id)
        .bind(input.image_file_name)
        .bind(input.image_content_type)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn replace_post(&self, post: Post) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET caption = $2,
                posted_at = $3,
                user_id = $4,
                image_file_name = $5,
                image_content_type = $6
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(post.caption)
        .bind(post.posted_at)
        .bind(post.user_id)
        .bind(post.image_file_name)
        .bind(post.image_content_type)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConcurrencyConflict(format!(
                "post with id {} was not updated",
                post.id
            )));
        }
        Ok(())
    }

    async fn delete_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            DELETE FROM posts
            WHERE id = $1
            RETURNING id, caption, posted_at, user_id, image_file_name, image_content_type
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.caption,
        row.posted_at,
        row.user_id,
        row.image_file_name,
        row.image_content_type,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_row_to_summary(row: PostSummaryRow) -> PostSummary {
    PostSummary {
        id: row.id,
        caption: row.caption,
        posted_at: row.posted_at,
        user: UserSummary {
            id: row.user_id,
            name: row.user_name,
            username: row.user_username,
        },
        likes: row.likes,
        comments: row.comments,
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("user referenced by the post does not exist".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
