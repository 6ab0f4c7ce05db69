//! In-memory реализации хранилищ для тестов сервисов и роутера.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::data::photo_storage::PhotoStorage;
use crate::data::post_repository::{NewPost, PostRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CommentView, Post, PostDetail, PostSummary};
use crate::domain::search::SearchTerm;
use crate::domain::user::UserSummary;

#[derive(Default)]
struct Store {
    users: HashMap<i64, UserSummary>,
    posts: Vec<Post>,
    comments: HashMap<i64, Vec<CommentView>>,
    likes: HashMap<i64, i64>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub(crate) struct FakePostRepo {
    store: Arc<Mutex<Store>>,
    /// Имитирует «потерянное» обновление: `replace_post` ничего не пишет.
    pub(crate) conflict_on_replace: Arc<Mutex<bool>>,
}

impl FakePostRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_user(&self, id: i64, name: &str, username: &str) {
        self.store.lock().expect("store mutex poisoned").users.insert(
            id,
            UserSummary {
                id,
                name: name.to_string(),
                username: username.to_string(),
            },
        );
    }

    pub(crate) fn add_post(&self, user_id: i64, caption: Option<&str>, image: Option<&str>) -> i64 {
        let mut store = self.store.lock().expect("store mutex poisoned");
        store.next_id += 1;
        let id = store.next_id;
        store.posts.push(Post {
            id,
            caption: caption.map(str::to_string),
            posted_at: Utc::now(),
            user_id,
            image_file_name: image.map(str::to_string),
            image_content_type: image.map(|_| "image/jpeg".to_string()),
        });
        id
    }

    pub(crate) fn add_comment(&self, post_id: i64, author_name: &str, text: &str) {
        self.store
            .lock()
            .expect("store mutex poisoned")
            .comments
            .entry(post_id)
            .or_default()
            .push(CommentView {
                author_name: author_name.to_string(),
                posted_at: Utc::now(),
                text: text.to_string(),
            });
    }

    pub(crate) fn set_likes(&self, post_id: i64, likes: i64) {
        self.store
            .lock()
            .expect("store mutex poisoned")
            .likes
            .insert(post_id, likes);
    }

    pub(crate) fn posts(&self) -> Vec<Post> {
        self.store.lock().expect("store mutex poisoned").posts.clone()
    }

    fn summary(store: &Store, post: &Post) -> Result<PostSummary, DomainError> {
        let user = store
            .users
            .get(&post.user_id)
            .cloned()
            .ok_or_else(|| DomainError::Unexpected("dangling user".to_string()))?;
        Ok(PostSummary {
            id: post.id,
            caption: post.caption.clone(),
            posted_at: post.posted_at,
            user,
            likes: store.likes.get(&post.id).copied().unwrap_or(0),
            comments: store.comments.get(&post.id).map_or(0, |c| c.len() as i64),
        })
    }
}

#[async_trait]
impl PostRepository for FakePostRepo {
    async fn list_posts(
        &self,
        filter: Option<&SearchTerm>,
    ) -> Result<Vec<PostSummary>, DomainError> {
        let store = self.store.lock().expect("store mutex poisoned");
        let mut result = Vec::new();
        for post in &store.posts {
            let summary = Self::summary(&store, post)?;
            let keep = filter.is_none_or(|term| {
                term.matches(&summary.user.name, summary.caption.as_deref())
            });
            if keep {
                result.push(summary);
            }
        }
        Ok(result)
    }

    async fn get_post_detail(&self, id: i64) -> Result<Option<PostDetail>, DomainError> {
        let store = self.store.lock().expect("store mutex poisoned");
        let Some(post) = store.posts.iter().find(|p| p.id == id) else {
            return Ok(None);
        };
        let summary = Self::summary(&store, post)?;
        Ok(Some(PostDetail {
            id: summary.id,
            caption: summary.caption,
            posted_at: summary.posted_at,
            user: summary.user,
            likes: summary.likes,
            comments: store.comments.get(&id).cloned().unwrap_or_default(),
        }))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn post_exists(&self, id: i64) -> Result<bool, DomainError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store.posts.iter().any(|p| p.id == id))
    }

    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut store = self.store.lock().expect("store mutex poisoned");
        if !store.users.contains_key(&input.user_id) {
            return Err(DomainError::NotFound("user".to_string()));
        }
        store.next_id += 1;
        let post = Post {
            id: store.next_id,
            caption: input.caption,
            posted_at: Utc::now(),
            user_id: input.user_id,
            image_file_name: Some(input.image_file_name),
            image_content_type: input.image_content_type,
        };
        store.posts.push(post.clone());
        Ok(post)
    }

    async fn replace_post(&self, post: Post) -> Result<(), DomainError> {
        let conflict = *self
            .conflict_on_replace
            .lock()
            .expect("conflict mutex poisoned");
        let mut store = self.store.lock().expect("store mutex poisoned");
        let slot = store.posts.iter_mut().find(|p| p.id == post.id);
        match slot {
            Some(slot) if !conflict => {
                *slot = post;
                Ok(())
            }
            _ => Err(DomainError::ConcurrencyConflict(format!(
                "post with id {} was not updated",
                post.id
            ))),
        }
    }

    async fn delete_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut store = self.store.lock().expect("store mutex poisoned");
        let Some(index) = store.posts.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        Ok(Some(store.posts.remove(index)))
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakePhotoStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl FakePhotoStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&self, file_name: &str, bytes: &[u8]) {
        self.files
            .lock()
            .expect("files mutex poisoned")
            .insert(file_name.to_string(), bytes.to_vec());
    }

    pub(crate) fn file_names(&self) -> Vec<String> {
        self.files
            .lock()
            .expect("files mutex poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PhotoStorage for FakePhotoStorage {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        self.put(file_name, bytes);
        Ok(())
    }

    async fn load(&self, file_name: &str) -> Result<Vec<u8>, DomainError> {
        self.files
            .lock()
            .expect("files mutex poisoned")
            .get(file_name)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("photo file {file_name} does not exist")))
    }
}

/// Учётные записи в памяти; логин уникален, как в таблице `users`.
#[derive(Clone, Default)]
pub(crate) struct FakeUserRepo {
    accounts: Arc<Mutex<Vec<UserCredentials>>>,
}

impl FakeUserRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stored_hash(&self, username: &str) -> Option<String> {
        self.accounts
            .lock()
            .expect("accounts mutex poisoned")
            .iter()
            .find(|account| account.user.username == username)
            .map(|account| account.password_hash.clone())
    }
}

#[async_trait]
impl UserRepository for FakeUserRepo {
    async fn create_user(&self, input: NewUser) -> Result<UserSummary, DomainError> {
        let mut accounts = self.accounts.lock().expect("accounts mutex poisoned");
        if accounts.iter().any(|a| a.user.username == input.username) {
            return Err(DomainError::AlreadyExists("userName".to_string()));
        }

        let user = UserSummary {
            id: accounts.len() as i64 + 1,
            name: input.name,
            username: input.username,
        };
        accounts.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .accounts
            .lock()
            .expect("accounts mutex poisoned")
            .iter()
            .find(|account| account.user.username == username)
            .cloned())
    }
}
