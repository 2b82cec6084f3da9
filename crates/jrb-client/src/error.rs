//! Error types for calls against the positions API.

/// Everything that can go wrong with a single API request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The server answered 401 to an authenticated call, or no usable token
    /// was available to send. Either way the session is over.
    #[error("session expired")]
    AuthExpired,

    /// Any other non-2xx answer. `message` is the server's own text, if it
    /// sent one.
    #[error("request failed with status {status}")]
    RequestFailed { status: u16, message: Option<String> },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Text for the user: the server's message when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::RequestFailed {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
