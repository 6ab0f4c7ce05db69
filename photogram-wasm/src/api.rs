use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

use crate::helpers::{endpoint, error_message};
use crate::models::{
    AuthResponse, CreatedPost, LoginRequest, PostDetail, PostSummary, RegisterRequest,
};

#[derive(Debug, Clone)]
pub(crate) enum ApiError {
    Network(String),
    Http { status: u16, message: String },
    Decode(String),
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, message } => write!(f, "http error {status}: {message}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Network(format!("{err:?}"))
}

fn with_token(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(ApiError::Http {
        status,
        message: error_message(status, &text),
    })
}

async fn send(request: Request) -> Result<Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    check(response).await
}

async fn send_for_json<T: DeserializeOwned>(request: Request) -> Result<T, ApiError> {
    send(request)
        .await?
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

fn build(builder: RequestBuilder) -> Result<Request, ApiError> {
    builder
        .build()
        .map_err(|err| ApiError::Network(err.to_string()))
}

pub(crate) async fn register(
    user_name: &str,
    name: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let payload = RegisterRequest {
        user_name: user_name.to_string(),
        name: name.to_string(),
        password: password.to_string(),
    };

    let request = Request::post(&endpoint("/api/account/register"))
        .json(&payload)
        .map_err(|err| ApiError::Network(err.to_string()))?;
    send_for_json(request).await
}

pub(crate) async fn login(user_name: &str, password: &str) -> Result<AuthResponse, ApiError> {
    let payload = LoginRequest {
        user_name: user_name.to_string(),
        password: password.to_string(),
    };

    let request = Request::post(&endpoint("/api/account/login"))
        .json(&payload)
        .map_err(|err| ApiError::Network(err.to_string()))?;
    send_for_json(request).await
}

pub(crate) async fn logout(token: Option<&str>) -> Result<(), ApiError> {
    let request = build(with_token(
        Request::post(&endpoint("/api/account/logout")),
        token,
    ))?;
    send(request).await?;
    Ok(())
}

pub(crate) async fn list_posts(search: Option<&str>) -> Result<Vec<PostSummary>, ApiError> {
    let mut builder = Request::get(&endpoint("/api/posts"));
    if let Some(term) = search {
        builder = builder.query([("pesquisa", term)]);
    }
    send_for_json(build(builder)?).await
}

pub(crate) async fn get_post(id: i64) -> Result<PostDetail, ApiError> {
    send_for_json(build(Request::get(&endpoint(&format!("/api/posts/{id}"))))?).await
}

/// Отправляет multipart-форму; без токена сервер отклонит запрос.
pub(crate) async fn create_post(
    token: Option<&str>,
    caption: &str,
    photo: &File,
) -> Result<CreatedPost, ApiError> {
    let form = FormData::new().map_err(js_error)?;
    if !caption.trim().is_empty() {
        form.append_with_str("caption", caption).map_err(js_error)?;
    }
    form.append_with_blob_and_filename("fotografia", photo, &photo.name())
        .map_err(js_error)?;

    let request = with_token(Request::post(&endpoint("/api/posts")), token)
        .body(form)
        .map_err(|err| ApiError::Network(err.to_string()))?;
    send_for_json(request).await
}

pub(crate) async fn delete_post(id: i64) -> Result<(), ApiError> {
    send(build(Request::delete(&endpoint(&format!("/api/posts/{id}"))))?).await?;
    Ok(())
}
