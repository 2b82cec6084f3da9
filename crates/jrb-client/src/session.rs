use std::sync::{Arc, Mutex};

use jrb_types::TokenClaims;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::token;
use crate::LOGIN_PATH;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage is missing or refused the write.
    #[error("token storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the bearer token lives between page loads.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self);
}

/// Sends the user somewhere else in the app.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Token store that lives only as long as the process.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot().clone()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

/// Owns the bearer token: saved at login, read for every authenticated
/// request, dropped on logout or when the server answers 401.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn save_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.save(token)?;
        debug!("session token saved");
        Ok(())
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.load()
    }

    pub fn logout(&self) {
        self.store.clear();
    }

    /// The token, but only if it is fit to send as a bearer credential.
    pub fn bearer(&self) -> Option<String> {
        match self.get_token() {
            Some(t) if token::is_well_formed(&t) => Some(t),
            Some(_) => {
                warn!("stored session token is malformed");
                None
            }
            None => None,
        }
    }

    /// The 401 path: clear the session and go back to the login page.
    pub fn expire(&self) {
        info!("session rejected, returning to login");
        self.logout();
        self.navigator.redirect(LOGIN_PATH);
    }

    /// User-initiated logout.
    pub fn sign_out(&self) {
        info!("signed out");
        self.logout();
        self.navigator.redirect(LOGIN_PATH);
    }

    pub fn redirect(&self, path: &str) {
        self.navigator.redirect(path);
    }

    pub fn claims(&self) -> Option<TokenClaims> {
        let t = self.get_token()?;
        token::decode_claims(&t).ok()
    }

    /// Expiry of the current token for display, if it is a JWT with `exp`.
    pub fn expires_at(&self) -> Option<String> {
        self.claims()?.exp.and_then(token::format_expiry)
    }
}
