use leptos::ev::SubmitEvent;
use leptos::prelude::*;

#[component]
pub fn LoginPage() -> impl IntoView {
    let (username, setUsername) = signal(String::new());
    let (password, setPassword) = signal(String::new());
    let (error, setError) = signal(Option::<String>::None);
    #[allow(unused_variables)]
    let (pending, setPending) = signal(false);

    let handleSubmit = move |ev: SubmitEvent| {
        ev.prevent_default();
        setError.set(None);

        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen_futures::spawn_local;

            let auth = match crate::browser::Backend::connect() {
                Ok(backend) => backend.auth(),
                Err(e) => {
                    setError.set(Some(e));
                    return;
                }
            };
            let user = username.get_untracked();
            let pass = password.get_untracked();

            setPending.set(true);
            spawn_local(async move {
                if let Err(message) = auth.login(&user, &pass).await {
                    setError.set(Some(message));
                }
                setPending.set(false);
            });
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <div class="login-header">
                    <div class="login-icon">"J"</div>
                    <h1>"Login"</h1>
                </div>

                <form on:submit=handleSubmit>
                    <div class="form-group">
                        <label for="username">"Username"</label>
                        <input
                            type="text"
                            id="username"
                            placeholder="Username"
                            prop:value=move || username.get()
                            on:input=move |ev| setUsername.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            type="password"
                            id="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| setPassword.set(event_target_value(&ev))
                        />
                    </div>

                    {move || error.get().map(|message| view! { <div class="login-error">{message}</div> })}

                    <button type="submit" class="btn btn-primary" disabled=move || pending.get()>
                        {move || if pending.get() { "Signing in..." } else { "Login" }}
                    </button>
                </form>

                <a href="/register" class="btn btn-link">"Create an account"</a>
            </div>
        </div>
    }
}
