//! Inspection of access tokens: shape checks before sending, and JWT claim
//! decoding for display. Nothing here verifies signatures.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jrb_types::TokenClaims;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    NotJwt,

    #[error("token payload is not base64url: {0}")]
    Encoding(String),

    #[error("token payload is not a claims object: {0}")]
    Claims(String),
}

/// True when the token can go into an `Authorization: Bearer` header as-is:
/// non-empty, visible ASCII only.
pub fn is_well_formed(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| (0x21..=0x7e).contains(&b))
}

pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [_header, payload, _signature] = parts.as_slice() else {
        return Err(TokenError::NotJwt);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// Formats an `exp` claim (seconds since the epoch) for display.
pub fn format_expiry(exp: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(exp, 0)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
}
