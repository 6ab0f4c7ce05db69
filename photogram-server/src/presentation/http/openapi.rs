use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::account::{AuthResponseDto, LoginDto, RegisterDto};
use crate::presentation::http::handlers::posts::{
    CommentDto, CreatePostForm, CreatedPostDto, PostDetailDto, PostDto, PostPayloadDto,
    PostSummaryDto, UserDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::account::register,
        crate::presentation::http::handlers::account::login,
        crate::presentation::http::handlers::account::logout,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::get_post_photo,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            PostSummaryDto,
            PostDetailDto,
            CommentDto,
            PostDto,
            CreatedPostDto,
            CreatePostForm,
            PostPayloadDto
        )
    ),
    tags(
        (name = "account", description = "Registration and sessions"),
        (name = "posts", description = "Photo posts")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
