use leptos::ev::MouseEvent;
use leptos::prelude::*;

use crate::helpers::{caption_text, photo_url};
use crate::state::AppState;

/// Оверлей открытой публикации со всеми комментариями.
#[component]
pub(crate) fn PostDetailView(state: AppState) -> impl IntoView {
    let close = move |_: MouseEvent| state.selected.set(None);

    view! {
        {move || {
            state.selected.get().map(|post| {
                let comments = post.comments.clone();
                view! {
                    <div class="detail-overlay">
                        <div class="detail">
                            <button on:click=close>"Close"</button>
                            <img src=photo_url(post.id) alt=caption_text(post.caption.as_deref()) />
                            <h2>{post.user.name.clone()}</h2>
                            <p>{caption_text(post.caption.as_deref())}</p>
                            <small>{format!("♥ {}  {}", post.likes, post.posted_at)}</small>

                            <h3>{format!("Комментарии ({})", comments.len())}</h3>
                            <ul>
                                {comments
                                    .into_iter()
                                    .map(|comment| {
                                        view! {
                                            <li>
                                                <strong>{comment.name}</strong>
                                                ": "
                                                {comment.text}
                                                <small>{format!(" ({})", comment.posted_at)}</small>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        </div>
                    </div>
                }
            })
        }}
    }
}
