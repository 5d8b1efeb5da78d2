use leptos::*;

use crate::api;

#[component]
pub fn Login() -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    let submit_login = create_action(move |_: &()| async move {
        set_error.set(None);
        match api::login(&username.get_untracked(), &password.get_untracked()).await {
            Ok(response) => {
                api::store_session(&response.token, &username.get_untracked());
                let navigate = leptos_router::use_navigate();
                navigate("/", Default::default());
            }
            Err(e) => set_error.set(Some(format!("Login failed: {}", e))),
        }
    });

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        submit_login.dispatch(());
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Netwatch Login"</h1>
                <p class="tagline">"Network Alert Management"</p>

                {move || error.get().map(|msg| view! {
                    <div class="alert alert-error">{msg}</div>
                })}

                <form on:submit=submit>
                    <div class="form-group">
                        <label>"Username"</label>
                        <input
                            type="text"
                            required
                            placeholder="operator"
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            prop:value=username
                        />
                    </div>

                    <div class="form-group">
                        <label>"Password"</label>
                        <input
                            type="password"
                            required
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                        />
                    </div>

                    <button type="submit" class="btn btn-primary btn-block">
                        "Login"
                    </button>
                </form>

                <p class="version">"Version 0.1.0"</p>
            </div>
        </div>
    }
}
