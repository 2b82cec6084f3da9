use jrb_types::{LoginRequest, RegisterRequest};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionManager;
use crate::{DASHBOARD_PATH, LOGIN_PATH};

const LOGIN_FAILED: &str = "Login failed";
const LOGIN_UNREACHABLE: &str = "Network error. Check API server.";
const REGISTER_FAILED: &str = "Register failed";
const REGISTER_UNREACHABLE: &str = "Something went wrong";
const SESSION_NOT_STORED: &str = "Could not store session. Check browser storage settings.";

/// Login and registration. Both run without a bearer token.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionManager,
}

impl AuthService {
    pub fn new(api: ApiClient, session: SessionManager) -> Self {
        Self { api, session }
    }

    /// Exchanges credentials for a token, stores it and opens the dashboard.
    /// The error is the text to show under the form. A token that cannot be
    /// stored leaves the user on the login page.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), String> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        match self.api.login(&request).await {
            Ok(resp) => {
                if let Err(e) = self.session.save_token(&resp.access_token) {
                    warn!("login succeeded but the token was not stored: {e}");
                    return Err(SESSION_NOT_STORED.to_string());
                }
                info!("logged in as {username}");
                self.session.redirect(DASHBOARD_PATH);
                Ok(())
            }
            Err(e @ ApiError::RequestFailed { .. }) => Err(e.user_message(LOGIN_FAILED)),
            Err(e) => {
                warn!("login unreachable: {e}");
                Err(LOGIN_UNREACHABLE.to_string())
            }
        }
    }

    pub async fn register(&self, username: &str, address: &str, password: &str) -> Result<(), String> {
        let request = RegisterRequest {
            username: username.to_string(),
            address: address.to_string(),
            password: password.to_string(),
        };

        match self.api.register(&request).await {
            Ok(()) => {
                info!("registered {username}");
                self.session.redirect(LOGIN_PATH);
                Ok(())
            }
            Err(e @ ApiError::RequestFailed { .. }) => Err(e.user_message(REGISTER_FAILED)),
            Err(e) => {
                warn!("register unreachable: {e}");
                Err(REGISTER_UNREACHABLE.to_string())
            }
        }
    }
}
