use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::post_command_service::PostCommandService;
use crate::application::post_query_service::PostQueryService;
use crate::data::photo_storage::PhotoStorage;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

pub(crate) type SharedUsers = Arc<dyn UserRepository>;
pub(crate) type SharedPosts = Arc<dyn PostRepository>;
pub(crate) type SharedPhotos = Arc<dyn PhotoStorage>;

pub(crate) type Accounts = AuthService<SharedUsers>;
pub(crate) type PostQueries = PostQueryService<SharedPosts, SharedPhotos>;
pub(crate) type PostCommands = PostCommandService<SharedPosts, SharedPhotos>;

/// Состояние HTTP-слоя. Хранилища скрыты за трейт-объектами, поэтому
/// роутер собирается одинаково над PostgreSQL и над in-memory реализациями.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<Accounts>,
    pub(crate) post_queries: Arc<PostQueries>,
    pub(crate) post_commands: Arc<PostCommands>,
}

impl AppState {
    pub(crate) fn new(
        users: SharedUsers,
        posts: SharedPosts,
        photos: SharedPhotos,
        jwt: JwtService,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(users, jwt)),
            post_queries: Arc::new(PostQueryService::new(posts.clone(), photos.clone())),
            post_commands: Arc::new(PostCommandService::new(posts, photos)),
        }
    }
}
