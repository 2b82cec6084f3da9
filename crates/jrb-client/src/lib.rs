pub mod api;
pub mod auth;
pub mod error;
pub mod positions;
pub mod session;
pub mod token;

pub use api::ApiClient;
pub use auth::AuthService;
pub use error::ApiError;
pub use positions::{ListState, Outcome, PositionDraft, PositionsController};
pub use session::{MemoryTokenStore, Navigator, SessionManager, StoreError, TokenStore};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Interactive yes/no prompt shown before destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}
