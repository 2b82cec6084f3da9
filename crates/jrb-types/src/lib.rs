pub mod auth;
pub mod position;

pub use auth::*;
pub use position::*;

/// Base URL of the positions API, shared via Leptos context during SSR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiBase(pub String);
