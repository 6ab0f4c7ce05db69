use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{PhotogramClientError, PhotogramClientResult};
use crate::models::{AuthResponse, CreatedPost, PhotoUpload, Post, PostDetail, PostSummary};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequestDto<'a> {
    user_name: &'a str,
    name: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequestDto<'a> {
    user_name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ListPostsQuery<'a> {
    pesquisa: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponseDto {
    mensagem: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorResponseDto {
    fn describe(self) -> Option<String> {
        let fields: Vec<String> = self
            .errors
            .into_iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();

        match (self.mensagem, fields.is_empty()) {
            (Some(message), true) => Some(message),
            (Some(message), false) => Some(format!("{message} ({})", fields.join("; "))),
            (None, false) => Some(fields.join("; ")),
            (None, true) => None,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `photogram-server`.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(base_url: impl Into<String>) -> PhotogramClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: Response) -> PhotogramClientError {
        let status = response.status();

        let message = response
            .json::<ErrorResponseDto>()
            .await
            .ok()
            .and_then(ErrorResponseDto::describe);
        PhotogramClientError::from_http_status(status, message)
    }

    async fn send(request: RequestBuilder) -> PhotogramClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(PhotogramClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn send_for_json<T: DeserializeOwned>(request: RequestBuilder) -> PhotogramClientResult<T> {
        Self::send(request)
            .await?
            .json::<T>()
            .await
            .map_err(PhotogramClientError::from_reqwest)
    }

    pub(crate) async fn register(
        &self,
        user_name: &str,
        name: &str,
        password: &str,
    ) -> PhotogramClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            user_name,
            name,
            password,
        };
        let request = self
            .request(Method::POST, "/api/account/register", None)
            .json(&payload);
        Self::send_for_json(request).await
    }

    pub(crate) async fn login(
        &self,
        user_name: &str,
        password: &str,
    ) -> PhotogramClientResult<AuthResponse> {
        let payload = LoginRequestDto {
            user_name,
            password,
        };
        let request = self
            .request(Method::POST, "/api/account/login", None)
            .json(&payload);
        Self::send_for_json(request).await
    }

    pub(crate) async fn logout(&self, token: Option<&str>) -> PhotogramClientResult<()> {
        Self::send(self.request(Method::POST, "/api/account/logout", token)).await?;
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        search: Option<&str>,
    ) -> PhotogramClientResult<Vec<PostSummary>> {
        let mut request = self.request(Method::GET, "/api/posts", None);
        if let Some(pesquisa) = search {
            request = request.query(&ListPostsQuery { pesquisa });
        }
        Self::send_for_json(request).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> PhotogramClientResult<PostDetail> {
        Self::send_for_json(self.request(Method::GET, &format!("/api/posts/{id}"), None)).await
    }

    pub(crate) async fn get_photo(&self, id: i64) -> PhotogramClientResult<Vec<u8>> {
        let response =
            Self::send(self.request(Method::GET, &format!("/api/posts/{id}/foto"), None)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(PhotogramClientError::from_reqwest)?;
        Ok(bytes.to_vec())
    }

    pub(crate) async fn create_post(
        &self,
        token: Option<&str>,
        caption: Option<&str>,
        photo: PhotoUpload,
    ) -> PhotogramClientResult<CreatedPost> {
        let part = Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.content_type)?;

        let mut form = Form::new().part("fotografia", part);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        let request = self
            .request(Method::POST, "/api/posts", token)
            .multipart(form);
        Self::send_for_json(request).await
    }

    pub(crate) async fn update_post(&self, post: &Post) -> PhotogramClientResult<()> {
        let request = self
            .request(Method::PUT, &format!("/api/posts/{}", post.id), None)
            .json(post);
        Self::send(request).await?;
        Ok(())
    }

    pub(crate) async fn delete_post(&self, id: i64) -> PhotogramClientResult<Post> {
        Self::send_for_json(self.request(Method::DELETE, &format!("/api/posts/{id}"), None)).await
    }
}
