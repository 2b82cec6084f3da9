use jrb_types::ApiBase;
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Route, Router, Routes},
    StaticSegment,
};

use crate::components::toast::ToastProvider;
use crate::pages::dashboard::DashboardPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::register::RegisterPage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    // The hydrated client reads the API base back out of this tag.
    let apiBase = use_context::<ApiBase>().map(|base| base.0).unwrap_or_default();

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <meta name="api-base" content=apiBase />
                <link rel="icon" href="/favicon.svg" type="image/svg+xml" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/jrb-console.css" />
        <Title text="JRB Console" />
        <ToastProvider>
            <Router>
                <Routes fallback=|| view! { <p>"Page not found."</p> }.into_any()>
                    <Route path=StaticSegment("") view=HomePage />
                    <Route path=StaticSegment("login") view=LoginPage />
                    <Route path=StaticSegment("register") view=RegisterPage />
                    <Route path=StaticSegment("dashboard") view=DashboardView />
                </Routes>
            </Router>
        </ToastProvider>
    }
}

#[component]
fn DashboardView() -> impl IntoView {
    view! {
        <main class="main-content">
            <DashboardPage />
        </main>
    }
}
