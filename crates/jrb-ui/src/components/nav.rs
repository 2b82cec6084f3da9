use leptos::prelude::*;

#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="nav-bar">
            <div class="nav-brand">
                <div class="brand-icon">"J"</div>
                <span class="brand-text">"JRB"</span>
            </div>
            <ul class="nav-links">
                <li class="nav-item">
                    <a href="/login" class="btn btn-primary">"Login"</a>
                </li>
                <li class="nav-item">
                    <a href="/register" class="btn btn-primary">"Register"</a>
                </li>
            </ul>
        </nav>
    }
}
