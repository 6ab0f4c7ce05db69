use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, get_post, get_post_photo, list_posts, update_post,
};
use crate::presentation::http::middleware::auth::identify_user_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/{id}/foto", get(get_post_photo))
        .layer(middleware::from_fn_with_state(
            state,
            identify_user_middleware,
        ))
}
