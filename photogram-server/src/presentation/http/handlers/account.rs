use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::auth_service::AuthSession;
use crate::domain::user::{LoginAttempt, Registration};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::posts::UserDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) user_name: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) name: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) user_name: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
}

impl From<AuthSession> for AuthResponseDto {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            user: session.user.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/account/register",
    tag = "account",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User name already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let form = Registration::parse(&dto.user_name, &dto.name, dto.password)?;
    let session = state.auth_service.register(form).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/api/account/login",
    tag = "account",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<Json<AuthResponseDto>> {
    dto.validate()?;

    let attempt = LoginAttempt::parse(&dto.user_name, dto.password)?;
    let session = state.auth_service.login(attempt).await?;
    Ok(Json(session.into()))
}

/// Токены не хранятся на сервере: выход сводится к тому, что клиент забывает токен.
#[utoipa::path(
    post,
    path = "/api/account/logout",
    tag = "account",
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub(crate) async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
