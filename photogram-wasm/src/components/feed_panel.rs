use leptos::ev::SubmitEvent;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::{load_posts, open_post};
use crate::helpers::{caption_text, is_own_post, photo_url};
use crate::state::AppState;

#[component]
pub(crate) fn FeedPanel(state: AppState) -> impl IntoView {
    let create_caption = RwSignal::new(String::new());
    let photo_input: NodeRef<Input> = NodeRef::new();

    let on_search = Callback::new(move |ev: SubmitEvent| {
        ev.prevent_default();
        load_posts(state);
    });

    let on_create_post = Callback::new(move |ev: SubmitEvent| {
        ev.prevent_default();
        state.clear_error();

        let Some(photo) = photo_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            state.set_error("Выберите фотографию в формате JPEG");
            return;
        };

        let caption = create_caption.get_untracked();
        let token = state.token.get_untracked();

        state.loading.set(true);
        spawn_local(async move {
            match api::create_post(token.as_deref(), &caption, &photo).await {
                Ok(_) => {
                    create_caption.set(String::new());
                    if let Some(input) = photo_input.get_untracked() {
                        input.set_value("");
                    }
                    load_posts(state);
                }
                Err(err) => {
                    state.set_error(err.to_string());
                    state.loading.set(false);
                }
            }
        });
    });

    let on_delete_post = Callback::new(move |post_id: i64| {
        state.clear_error();
        state.loading.set(true);

        spawn_local(async move {
            match api::delete_post(post_id).await {
                Ok(()) => {
                    state.posts.update(|posts| posts.retain(|p| p.id != post_id));
                    state.clear_error();
                }
                Err(err) => state.set_error(err.to_string()),
            }
            state.loading.set(false);
        });
    });

    view! {
        <form on:submit=move |ev| on_search.run(ev)>
            <input
                placeholder="pesquisa"
                prop:value=move || state.search.get()
                on:input=move |ev| state.search.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || state.loading.get()>"Search"</button>
        </form>

        <Show when=move || state.is_authenticated()>
            <h3 style="margin-top: 1rem;">"New post"</h3>
            <form on:submit=move |ev| on_create_post.run(ev)>
                <input
                    placeholder="caption"
                    prop:value=move || create_caption.get()
                    on:input=move |ev| create_caption.set(event_target_value(&ev))
                />
                <input type="file" accept="image/jpeg" node_ref=photo_input />
                <button type="submit" disabled=move || state.loading.get()>
                    "Publish"
                </button>
            </form>
        </Show>

        <p style="margin-top: 0.5rem;">
            "Публикаций: "
            {move || state.posts.get().len()}
        </p>

        <For
            each=move || state.posts.get()
            key=|post| (post.id, post.likes, post.comments)
            children=move |post| {
                let post_id = post.id;
                let owned = {
                    let post = post.clone();
                    move || is_own_post(state.user.get().as_ref(), &post)
                };
                view! {
                    <article class="card">
                        <img src=photo_url(post_id) alt=caption_text(post.caption.as_deref()) />
                        <p>
                            <strong>{post.user.name.clone()}</strong>
                            " "
                            {caption_text(post.caption.as_deref())}
                        </p>
                        <small>
                            {format!("♥ {}  💬 {}  {}", post.likes, post.comments, post.posted_at)}
                        </small>
                        <div>
                            <button
                                on:click=move |_| open_post(state, post_id)
                                disabled=move || state.loading.get()
                            >
                                "Open"
                            </button>
                            <Show when=owned.clone()>
                                <button
                                    style="margin-left: 0.5rem;"
                                    on:click=move |_| on_delete_post.run(post_id)
                                    disabled=move || state.loading.get()
                                >
                                    "Delete"
                                </button>
                            </Show>
                        </div>
                    </article>
                }
            }
        />
    }
}
