use leptos::prelude::*;

use crate::components::nav::Nav;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <Nav />
            <div class="home-hero">
                <h1>"JRB Console"</h1>
                <p class="subtitle">"Positions administration"</p>
            </div>
        </div>
    }
}
