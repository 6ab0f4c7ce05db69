use leptos::prelude::*;

use crate::api;
use crate::components::auth_panel::AuthPanel;
use crate::components::feed_panel::FeedPanel;
use crate::components::post_detail::PostDetailView;
use crate::helpers::search_term;
use crate::state::AppState;
use crate::storage;

/// Перечитывает ленту с текущей строкой поиска.
pub(crate) fn load_posts(state: AppState) {
    state.loading.set(true);
    state.clear_error();
    let search = search_term(&state.search.get_untracked());

    leptos::task::spawn_local(async move {
        match api::list_posts(search.as_deref()).await {
            Ok(posts) => state.posts.set(posts),
            Err(err) => state.set_error(err.to_string()),
        }
        state.loading.set(false);
    });
}

pub(crate) fn open_post(state: AppState, post_id: i64) {
    state.loading.set(true);
    state.clear_error();

    leptos::task::spawn_local(async move {
        match api::get_post(post_id).await {
            Ok(detail) => state.selected.set(Some(detail)),
            Err(err) => state.set_error(err.to_string()),
        }
        state.loading.set(false);
    });
}

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();

    if let (Some(token), Some(user)) = (storage::load_token(), storage::load_user()) {
        state.token.set(Some(token));
        state.user.set(Some(user));
    }

    load_posts(state);

    let error_text = move || state.error.get().unwrap_or_default();

    view! {
        <main class="page">
            <section class="container">
                <h1>"Photogram"</h1>

                <AuthPanel state=state />

                <Show when=move || !state.error.get().unwrap_or_default().is_empty()>
                    <div class="error-banner">
                        <strong>"Ошибка: "</strong>
                        {error_text}
                    </div>
                </Show>

                <FeedPanel state=state />
                <PostDetailView state=state />
            </section>
        </main>
    }
}
