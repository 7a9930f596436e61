//! reqwest implementation of `WakeBackend`

use super::error::{ActionError, AuthError, PollError};
use super::WakeBackend;
use crate::models::{StatusSnapshot, Token};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

/// Error body every non-2xx backend response carries
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the wake backend's `/api/*` routes
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    auth_url: Url,
    status_url: Url,
    wol_url: Url,
    unlock_url: Url,
}

impl HttpBackend {
    /// Create a backend client rooted at `server_url` (e.g. `https://wake.example.net`)
    pub fn new(server_url: &str, request_timeout: Duration) -> crate::Result<Self> {
        let mut base = Url::parse(server_url)
            .with_context(|| format!("Invalid server URL: {}", server_url))?;

        // Url::join drops the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            auth_url: base.join("api/auth")?,
            status_url: base.join("api/status")?,
            wol_url: base.join("api/wol")?,
            unlock_url: base.join("api/unlock")?,
        })
    }

    /// Base status URL, mostly for diagnostics
    pub fn status_url(&self) -> &Url {
        &self.status_url
    }
}

/// Pull `{"error": "..."}` out of a failed response, falling back to the status reason
async fn error_message(resp: Response) -> String {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

fn action_error(status: StatusCode, message: String) -> ActionError {
    if status == StatusCode::UNAUTHORIZED {
        ActionError::Unauthorized
    } else {
        ActionError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl WakeBackend for HttpBackend {
    async fn probe(&self) -> bool {
        match self.client.get(self.status_url.clone()).send().await {
            // 401 means the backend is up but needs auth
            Ok(resp) => resp.status() == StatusCode::UNAUTHORIZED,
            Err(e) => {
                tracing::debug!("Backend probe failed: {}", e);
                false
            }
        }
    }

    async fn authenticate(&self, pin: &str) -> Result<Token, AuthError> {
        let resp = self
            .client
            .post(self.auth_url.clone())
            .json(&serde_json::json!({ "pin": pin }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<Token>()
                .await
                .map_err(|e| AuthError::Transport(format!("Malformed auth response: {}", e)));
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidPin),
            StatusCode::TOO_MANY_REQUESTS => Err(AuthError::RateLimited),
            _ => Err(AuthError::Server {
                status: status.as_u16(),
                message: error_message(resp).await,
            }),
        }
    }

    async fn status(&self, token: &Token) -> Result<StatusSnapshot, PollError> {
        let resp = self
            .client
            .get(self.status_url.clone())
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PollError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PollError::Server {
                status: status.as_u16(),
                message: error_message(resp).await,
            });
        }

        resp.json::<StatusSnapshot>()
            .await
            .map_err(|e| PollError::Transport(format!("Malformed status response: {}", e)))
    }

    async fn wake(&self, token: &Token) -> Result<(), ActionError> {
        let resp = self
            .client
            .post(self.wol_url.clone())
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(action_error(status, error_message(resp).await))
    }

    async fn unlock(&self, token: &Token, passphrase: &str) -> Result<(), ActionError> {
        let resp = self
            .client
            .post(self.unlock_url.clone())
            .header(AUTHORIZATION, token.bearer())
            .json(&serde_json::json!({ "passphrase": passphrase }))
            .send()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(action_error(status, error_message(resp).await))
    }
}
