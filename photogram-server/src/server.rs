use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::AppState;
use crate::presentation::http::middleware::cors::apply_cors;
use crate::presentation::http::middleware::limits::apply_limits;
use crate::presentation::http::middleware::trace::apply_trace;
use crate::presentation::http::openapi::ApiDoc;
use crate::presentation::http::routes;

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    let app = apply_cors(app, settings)?;

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    routes::router(state.clone())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::build_router;
    use crate::application::fakes::{FakePhotoStorage, FakePostRepo, FakeUserRepo};
    use crate::domain::photo::PLACEHOLDER_PHOTO;
    use crate::infrastructure::jwt::JwtService;
    use crate::infrastructure::settings::Settings;
    use crate::presentation::AppState;
    use crate::presentation::http::middleware::limits::apply_limits;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";
    const BOUNDARY: &str = "photogram-form-boundary";
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];

    struct TestApp {
        router: Router,
        posts: FakePostRepo,
        photos: FakePhotoStorage,
    }

    fn test_app() -> TestApp {
        let posts = FakePostRepo::new();
        posts.add_user(5, "Carla Ourém", "carla");
        posts.add_user(6, "Bruno", "bruno");
        let photos = FakePhotoStorage::new();

        let state = AppState::new(
            Arc::new(FakeUserRepo::new()),
            Arc::new(posts.clone()),
            Arc::new(photos.clone()),
            JwtService::new(SECRET, 3600),
        );

        TestApp {
            router: build_router(state),
            posts,
            photos,
        }
    }

    fn bearer_for(user_id: i64) -> String {
        let token = JwtService::new(SECRET, 3600)
            .generate_token(user_id, "carla")
            .expect("token must be generated");
        format!("Bearer {token}")
    }

    enum FormPart<'a> {
        Text(&'a str, &'a str),
        File {
            field: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
    }

    fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                FormPart::Text(field, value) => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                ),
                FormPart::File {
                    field,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(parts: &[FormPart<'_>], bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/api/posts").header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, bearer);
        }
        builder
            .body(Body::from(multipart_body(parts)))
            .expect("request must build")
    }

    fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request must build")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request must build")
    }

    async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails")
    }

    async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable")
            .to_vec()
    }

    async fn body_json(response: Response<Body>) -> Value {
        serde_json::from_slice(&body_bytes(response).await).expect("body must be json")
    }

    fn payload(id: i64, caption: &str) -> Value {
        json!({
            "id": id,
            "caption": caption,
            "postedAt": "2024-05-01T10:00:00Z",
            "userId": 5,
            "imageFileName": null,
            "imageContentType": null
        })
    }

    #[tokio::test]
    async fn anonymous_png_upload_under_legacy_names_lists_every_field_error() {
        let app = test_app();
        let request = upload_request(
            &[
                FormPart::Text("publicacao", "praia"),
                FormPart::File {
                    field: "foto",
                    file_name: "praia.png",
                    content_type: "image/png",
                    bytes: JPEG,
                },
            ],
            None,
        );

        let response = send(&app.router, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["mensagem"], "validation failed");
        assert_eq!(body["errors"]["fotografia"][0], "the photo must be a JPG");
        assert_eq!(body["errors"]["userId"][0], "not authenticated");
        assert!(app.posts.posts().is_empty());
        assert!(app.photos.file_names().is_empty());
    }

    #[tokio::test]
    async fn authenticated_jpeg_upload_is_created_and_served_back() {
        let app = test_app();
        let bearer = bearer_for(5);
        let request = upload_request(
            &[
                FormPart::Text("publicacao", "  Pôr do sol  "),
                FormPart::File {
                    field: "foto",
                    file_name: "sunset.jpg",
                    content_type: "image/jpeg",
                    bytes: JPEG,
                },
            ],
            Some(&bearer),
        );

        let response = send(&app.router, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION]
            .to_str()
            .expect("location must be ascii")
            .to_string();

        let created = body_json(response).await;
        let id = created["id"].as_i64().expect("id must be a number");
        assert_eq!(location, format!("/api/posts/{id}"));
        assert_eq!(created["userId"], 5);
        assert_eq!(created["caption"], "Pôr do sol");
        assert_eq!(created["imageContentType"], "image/jpeg");
        assert_eq!(app.posts.posts().len(), 1);
        assert_eq!(app.photos.file_names().len(), 1);

        let response = send(&app.router, get(&format!("{location}/foto"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(body_bytes(response).await, JPEG);
    }

    #[tokio::test]
    async fn post_without_photo_serves_placeholder_as_jpeg() {
        let app = test_app();
        let id = app.posts.add_post(5, Some("sem foto"), None);
        app.photos.put(PLACEHOLDER_PHOTO, b"placeholder");

        let response = send(&app.router, get(&format!("/api/posts/{id}/foto"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(body_bytes(response).await, b"placeholder");
    }

    #[tokio::test]
    async fn oversized_upload_is_payload_too_large() {
        let app = test_app();
        let settings = Settings {
            database_url: "postgres://unused".to_string(),
            jwt_secret: SECRET.to_string(),
            jwt_ttl_seconds: 3600,
            http_addr: "127.0.0.1:0".to_string(),
            cors_origins: Vec::new(),
            log_level: "info".to_string(),
            http_request_body_limit_bytes: 1024,
            http_concurrency_limit: 4,
            photo_dir: PathBuf::from("images"),
        };
        let router = apply_limits(app.router.clone(), &settings);

        let big = vec![0xAB; 4096];
        let bearer = bearer_for(5);
        let request = upload_request(
            &[FormPart::File {
                field: "fotografia",
                file_name: "big.jpg",
                content_type: "image/jpeg",
                bytes: &big,
            }],
            Some(&bearer),
        );

        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(app.posts.posts().is_empty());
        assert!(app.photos.file_names().is_empty());
    }

    #[tokio::test]
    async fn list_applies_pesquisa_to_author_and_caption() {
        let app = test_app();
        let by_carla = app.posts.add_post(5, Some("Lisboa"), None);
        let about_ourem = app.posts.add_post(6, Some("Castelo de Ourém"), None);
        app.posts.add_post(6, Some("praia"), None);

        let response = send(&app.router, get("/api/posts?pesquisa=%20OUR%C3%89M%20")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let ids: Vec<i64> = body_json(response)
            .await
            .as_array()
            .expect("list must be an array")
            .iter()
            .filter_map(|post| post["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![by_carla, about_ourem]);

        let response = send(&app.router, get("/api/posts?pesquisa=%20%20")).await;
        let all = body_json(response).await;
        assert_eq!(all.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn replace_answers_no_content_and_rejects_id_mismatch() {
        let app = test_app();
        let id = app.posts.add_post(5, Some("velho"), None);

        let response = send(
            &app.router,
            json_request("PUT", &format!("/api/posts/{id}"), &payload(id, "novo")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(app.posts.posts()[0].caption.as_deref(), Some("novo"));

        let response = send(
            &app.router,
            json_request("PUT", &format!("/api/posts/{}", id + 1), &payload(id, "outro")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["errors"]["id"].is_array());
        assert_eq!(app.posts.posts()[0].caption.as_deref(), Some("novo"));
    }

    #[tokio::test]
    async fn missing_post_is_not_found_on_every_route() {
        let app = test_app();

        let requests = [
            get("/api/posts/42"),
            get("/api/posts/42/foto"),
            json_request("PUT", "/api/posts/42", &payload(42, "x")),
            Request::delete("/api/posts/42")
                .body(Body::empty())
                .expect("request must build"),
        ];
        for request in requests {
            let response = send(&app.router, request).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body = body_json(response).await;
            let message = body["mensagem"].as_str().expect("message must be a string");
            assert!(message.contains("42"), "unexpected message: {message}");
        }
    }

    #[tokio::test]
    async fn delete_returns_removed_record_then_detail_is_gone() {
        let app = test_app();
        let id = app.posts.add_post(5, Some("adeus"), Some("adeus.jpg"));
        app.photos.put("adeus.jpg", JPEG);

        let request = Request::delete(format!("/api/posts/{id}"))
            .body(Body::empty())
            .expect("request must build");
        let response = send(&app.router, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let deleted = body_json(response).await;
        assert_eq!(deleted["id"], id);
        assert_eq!(deleted["imageFileName"], "adeus.jpg");

        let response = send(&app.router, get(&format!("/api/posts/{id}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.photos.file_names(), vec!["adeus.jpg".to_string()]);
    }

    #[tokio::test]
    async fn registered_account_token_authors_new_posts() {
        let app = test_app();

        let response = send(
            &app.router,
            json_request(
                "POST",
                "/api/account/register",
                &json!({ "userName": "dora", "name": "Dora", "password": "segredo-forte" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let auth = body_json(response).await;
        assert_eq!(auth["user"]["userName"], "dora");
        let token = auth["accessToken"].as_str().expect("token must be a string");

        let user_id = auth["user"]["id"].as_i64().expect("id must be a number");
        app.posts.add_user(user_id, "Dora", "dora");

        let bearer = format!("Bearer {token}");
        let request = upload_request(
            &[FormPart::File {
                field: "fotografia",
                file_name: "dora.jpg",
                content_type: "image/jpg",
                bytes: JPEG,
            }],
            Some(&bearer),
        );
        let response = send(&app.router, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["userId"], user_id);

        let response = send(
            &app.router,
            json_request(
                "POST",
                "/api/account/login",
                &json!({ "userName": "dora", "password": "wrong-password" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
