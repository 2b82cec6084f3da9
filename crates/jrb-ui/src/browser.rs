//! Browser-side implementations of the client's storage, navigation and
//! confirmation seams.

use std::sync::Arc;

use jrb_client::{
    ApiClient, AuthService, Confirm, Navigator, PositionsController, SessionManager, StoreError,
    TokenStore,
};
use leptos::logging::warn;

const TOKEN_KEY: &str = "token";
const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Keeps the bearer token in `localStorage` so it survives reloads.
pub struct LocalStorageTokenStore;

impl LocalStorageTokenStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(TOKEN_KEY).ok().flatten()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".into()))?;
        storage
            .set_item(TOKEN_KEY, token)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn clear(&self) {
        match Self::storage() {
            Some(storage) => {
                if let Err(e) = storage.remove_item(TOKEN_KEY) {
                    warn!("failed to remove session token: {e:?}");
                }
            }
            None => warn!("localStorage is not available, session token not removed"),
        }
    }
}

pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn redirect(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            warn!("no window, cannot navigate to {path}");
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            warn!("navigation to {path} failed: {e:?}");
        }
    }
}

pub struct WindowConfirm;

impl Confirm for WindowConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}

/// API base URL rendered into the page by the server.
fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(r#"meta[name="api-base"]"#).ok().flatten())
        .and_then(|meta| meta.get_attribute("content"))
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Everything a page needs to talk to the API from the browser.
#[derive(Clone)]
pub struct Backend {
    api: ApiClient,
    session: SessionManager,
}

impl Backend {
    pub fn connect() -> Result<Self, String> {
        let api = ApiClient::new(api_base()).map_err(|e| e.to_string())?;
        let session = SessionManager::new(
            Arc::new(LocalStorageTokenStore),
            Arc::new(LocationNavigator),
        );
        Ok(Self { api, session })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    pub fn positions(&self) -> PositionsController {
        PositionsController::new(self.api.clone(), self.session.clone(), Arc::new(WindowConfirm))
    }
}
