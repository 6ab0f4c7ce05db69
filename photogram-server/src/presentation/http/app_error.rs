use std::collections::BTreeMap;

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

type FieldMessages = BTreeMap<String, Vec<String>>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    mensagem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldMessages>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mensagem, errors) = match self {
            AppError::Domain(err) => domain_error_parts(err),
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                "validation failed".to_string(),
                Some(validator_messages(&err)),
            ),
            AppError::Multipart(err) => (err.status(), err.body_text(), None),
        };

        (status, Json(ErrorBody { mensagem, errors })).into_response()
    }
}

fn domain_error_parts(err: DomainError) -> (StatusCode, String, Option<FieldMessages>) {
    match err {
        DomainError::Validation { field, message } => {
            let errors = BTreeMap::from([(field.to_string(), vec![message.to_string()])]);
            (
                StatusCode::BAD_REQUEST,
                "validation failed".to_string(),
                Some(errors),
            )
        }
        DomainError::InvalidFields(fields) => {
            let errors = fields
                .iter()
                .map(|(field, messages)| {
                    let messages = messages.iter().map(|m| m.to_string()).collect();
                    (field.to_string(), messages)
                })
                .collect();
            (
                StatusCode::BAD_REQUEST,
                "validation failed".to_string(),
                Some(errors),
            )
        }
        DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
        err @ DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string(), None),
        err @ DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string(), None),
        err @ (DomainError::ConcurrencyConflict(_) | DomainError::Unexpected(_)) => {
            error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
                None,
            )
        }
    }
}

fn validator_messages(err: &ValidationErrors) -> FieldMessages {
    err.field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::Value;

    use super::AppError;
    use crate::domain::error::{DomainError, FieldErrors};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let json = serde_json::from_slice(&body).expect("body must be json");
        (status, json)
    }

    #[tokio::test]
    async fn not_found_keeps_domain_message() {
        let (status, body) = render(
            DomainError::NotFound("post with id 7 does not exist".to_string()).into(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["mensagem"], "post with id 7 does not exist");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn invalid_fields_list_every_field() {
        let mut fields = FieldErrors::new();
        fields.add("userId", "not authenticated");
        fields.add("fotografia", "photo must be a JPEG image");

        let (status, body) = render(DomainError::InvalidFields(fields).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["userId"][0], "not authenticated");
        assert_eq!(body["errors"]["fotografia"][0], "photo must be a JPEG image");
    }

    #[tokio::test]
    async fn single_field_validation_is_bad_request() {
        let (status, body) = render(
            DomainError::Validation {
                field: "id",
                message: "does not match the route id",
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["id"][0], "does not match the route id");
    }

    #[tokio::test]
    async fn conflicts_and_unexpected_hide_details() {
        for err in [
            DomainError::ConcurrencyConflict("post with id 1 was not updated".to_string()),
            DomainError::Unexpected("db down".to_string()),
        ] {
            let (status, body) = render(err.into()).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["mensagem"], "internal error");
        }
    }

    #[tokio::test]
    async fn account_errors_map_to_auth_statuses() {
        let (status, _) = render(DomainError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = render(DomainError::AlreadyExists("userName".to_string()).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
