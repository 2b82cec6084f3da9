//! Thin client for the positions REST API.
//!
//! Only status mapping lives here. Deciding what a failure means for the
//! session or the view is left to the controller and auth flows.

use jrb_types::{ErrorBody, LoginRequest, LoginResponse, Position, RegisterRequest};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::ApiError;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let builder = self.client.post(self.url("/login")).json(request);
        let resp = send(builder, false, "POST /login").await?;
        Ok(resp.json::<LoginResponse>().await?)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let builder = self.client.post(self.url("/auth/register")).json(request);
        send(builder, false, "POST /auth/register").await?;
        Ok(())
    }

    pub async fn list_positions(&self, token: &str) -> Result<Vec<Position>, ApiError> {
        let builder = self.client.get(self.url("/positions")).bearer_auth(token);
        let resp = send(builder, true, "GET /positions").await?;
        Ok(resp.json::<Vec<Position>>().await?)
    }

    pub async fn create_position(&self, token: &str, position: &Position) -> Result<(), ApiError> {
        let builder = self
            .client
            .post(self.url("/positions"))
            .bearer_auth(token)
            .json(position);
        send(builder, true, "POST /positions").await?;
        Ok(())
    }

    pub async fn update_position(
        &self,
        token: &str,
        id: i64,
        position: &Position,
    ) -> Result<(), ApiError> {
        let builder = self
            .client
            .put(self.url(&format!("/positions/{id}")))
            .bearer_auth(token)
            .json(position);
        send(builder, true, "PUT /positions/{id}").await?;
        Ok(())
    }

    pub async fn delete_position(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let builder = self
            .client
            .delete(self.url(&format!("/positions/{id}")))
            .bearer_auth(token);
        send(builder, true, "DELETE /positions/{id}").await?;
        Ok(())
    }
}

/// Sends the request and maps non-2xx answers. A 401 only means an expired
/// session on authenticated calls; on login it is just a bad credential.
async fn send(builder: RequestBuilder, authenticated: bool, what: &str) -> Result<Response, ApiError> {
    let resp = builder.send().await.map_err(|e| {
        warn!("{what}: {e}");
        ApiError::Network(e.to_string())
    })?;

    let status = resp.status();
    debug!("{what} -> {status}");

    if status.is_success() {
        return Ok(resp);
    }

    if authenticated && status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::AuthExpired);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message);
    warn!("{what} failed: {status}");

    Err(ApiError::RequestFailed {
        status: status.as_u16(),
        message,
    })
}
