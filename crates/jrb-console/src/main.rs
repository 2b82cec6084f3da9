#![allow(non_snake_case)]

#[cfg(feature = "ssr")]
mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Debug, Default)]
    #[serde(default)]
    pub struct Config {
        pub server: ServerConfig,
        pub api: ApiConfig,
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct ServerConfig {
        pub bind: String,
        pub port: u16,
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct ApiConfig {
        pub base_url: String,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: "0.0.0.0".into(),
                port: 3000,
            }
        }
    }

    impl Default for ApiConfig {
        fn default() -> Self {
            Self {
                base_url: "http://localhost:8080".into(),
            }
        }
    }

    impl ServerConfig {
        pub fn addr(&self) -> Option<std::net::SocketAddr> {
            format!("{}:{}", self.bind, self.port).parse().ok()
        }
    }

    pub fn load(path: &str) -> Config {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to parse config {path}: {e}, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read config {path}: {e}, using defaults");
                Config::default()
            }
        }
    }

}

/// Per-request context for every Leptos render, including the fallback's
/// error pages, whose shell still emits the api-base meta tag.
#[cfg(feature = "ssr")]
fn api_context(apiBase: jrb_types::ApiBase) -> impl Fn() + Clone + Send + 'static {
    move || leptos::prelude::provide_context(apiBase.clone())
}


#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use jrb_types::ApiBase;
    use jrb_ui::{shell, App};
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse config path from args
    let args: Vec<String> = std::env::args().collect();
    let configPath = if let Some(idx) = args.iter().position(|a| a == "--config") {
        args.get(idx + 1)
            .cloned()
            .unwrap_or_else(|| "config.example.toml".into())
    } else {
        "config.example.toml".into()
    };

    let appConfig = config::load(&configPath);
    tracing::info!(
        "loaded config from {configPath}: bind={}:{} api={}",
        appConfig.server.bind,
        appConfig.server.port,
        appConfig.api.base_url
    );

    let apiBase = ApiBase(appConfig.api.base_url.clone());

    // Get Leptos configuration; the config file's bind address wins over site-addr
    let conf = get_configuration(None).expect("failed to load Leptos configuration");
    let mut leptosOptions = conf.leptos_options;
    match appConfig.server.addr() {
        Some(addr) => leptosOptions.site_addr = addr,
        None => tracing::warn!(
            "invalid bind address {}:{}, keeping {}",
            appConfig.server.bind,
            appConfig.server.port,
            leptosOptions.site_addr
        ),
    }
    let addr = leptosOptions.site_addr;

    // Generate route list from Leptos App
    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes_with_context(
            &leptosOptions,
            routes,
            api_context(apiBase.clone()),
            {
                let leptosOptions = leptosOptions.clone();
                move || shell(leptosOptions.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler_with_context(
            api_context(apiBase),
            shell,
        ))
        .with_state(leptosOptions)
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server exited with error");
}

#[cfg(not(feature = "ssr"))]
fn main() {}
