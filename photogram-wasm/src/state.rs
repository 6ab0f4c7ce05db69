use leptos::prelude::*;

use crate::models::{AuthResponse, PostDetail, PostSummary, User};

#[derive(Debug, Clone, Copy)]
pub(crate) struct AppState {
    pub(crate) token: RwSignal<Option<String>>,
    pub(crate) user: RwSignal<Option<User>>,
    pub(crate) posts: RwSignal<Vec<PostSummary>>,
    pub(crate) search: RwSignal<String>,
    /// Открытая публикация; `None`, когда детальный просмотр закрыт.
    pub(crate) selected: RwSignal<Option<PostDetail>>,
    pub(crate) error: RwSignal<Option<String>>,
    pub(crate) loading: RwSignal<bool>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            token: RwSignal::new(None),
            user: RwSignal::new(None),
            posts: RwSignal::new(Vec::new()),
            search: RwSignal::new(String::new()),
            selected: RwSignal::new(None),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }

    pub(crate) fn clear_error(&self) {
        self.error.set(None);
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }

    pub(crate) fn sign_in(&self, auth: AuthResponse) {
        self.token.set(Some(auth.access_token));
        self.user.set(Some(auth.user));
    }

    pub(crate) fn sign_out(&self) {
        self.token.set(None);
        self.user.set(None);
    }
}
