use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::api::ApiError;
use crate::models::AuthResponse;
use crate::state::AppState;
use crate::storage;

fn finish_sign_in(state: AppState, result: Result<AuthResponse, ApiError>) {
    match result {
        Ok(auth) => match storage::save_session(&auth.access_token, &auth.user) {
            Ok(()) => {
                state.sign_in(auth);
                state.clear_error();
            }
            Err(err) => state.set_error(err),
        },
        Err(err) => state.set_error(err.to_string()),
    }
    state.loading.set(false);
}

#[component]
pub(crate) fn AuthPanel(state: AppState) -> impl IntoView {
    let reg_user_name = RwSignal::new(String::new());
    let reg_name = RwSignal::new(String::new());
    let reg_password = RwSignal::new(String::new());

    let login_user_name = RwSignal::new(String::new());
    let login_password = RwSignal::new(String::new());

    let on_register = Callback::new(move |ev: SubmitEvent| {
        ev.prevent_default();
        state.clear_error();

        let user_name = reg_user_name.get_untracked().trim().to_string();
        let name = reg_name.get_untracked().trim().to_string();
        let password = reg_password.get_untracked();

        if user_name.is_empty() || name.is_empty() || password.is_empty() {
            state.set_error("Заполните все поля регистрации");
            return;
        }

        state.loading.set(true);
        spawn_local(async move {
            let result = api::register(&user_name, &name, &password).await;
            finish_sign_in(state, result);
        });
    });

    let on_login = Callback::new(move |ev: SubmitEvent| {
        ev.prevent_default();
        state.clear_error();

        let user_name = login_user_name.get_untracked().trim().to_string();
        let password = login_password.get_untracked();

        if user_name.is_empty() || password.is_empty() {
            state.set_error("Заполните все поля входа");
            return;
        }

        state.loading.set(true);
        spawn_local(async move {
            let result = api::login(&user_name, &password).await;
            finish_sign_in(state, result);
        });
    });

    let on_logout = Callback::new(move |_: ()| {
        let token = state.token.get_untracked();
        if let Err(err) = storage::clear_session() {
            state.set_error(err);
            return;
        }
        state.sign_out();
        state.clear_error();

        // сервер ничего не хранит; ошибка сети здесь не важна
        spawn_local(async move {
            let _ = api::logout(token.as_deref()).await;
        });
    });

    let welcome = move || {
        state
            .user
            .get()
            .map(|user| format!("Olá, {}!", user.name))
            .unwrap_or_default()
    };

    view! {
        <Show
            when=move || state.is_authenticated()
            fallback=move || view! {
                <h2>"Login"</h2>
                <form on:submit=move |ev| on_login.run(ev)>
                    <input
                        placeholder="user name"
                        on:input=move |ev| login_user_name.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="password"
                        type="password"
                        on:input=move |ev| login_password.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled=move || state.loading.get()>"Login"</button>
                </form>

                <h2 style="margin-top: 1rem;">"Register"</h2>
                <form on:submit=move |ev| on_register.run(ev)>
                    <input
                        placeholder="user name"
                        on:input=move |ev| reg_user_name.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="name"
                        on:input=move |ev| reg_name.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="password"
                        type="password"
                        on:input=move |ev| reg_password.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled=move || state.loading.get()>"Register"</button>
                </form>
            }
        >
            <p class="welcome">
                {welcome}
                <button
                    style="margin-left: 0.5rem;"
                    on:click=move |_| on_logout.run(())
                    disabled=move || state.loading.get()
                >
                    "Logout"
                </button>
            </p>
        </Show>

        <hr style="margin: 1rem 0;" />
    }
}
