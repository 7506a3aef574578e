//! HTTP Identity Provider
//!
//! Talks to the platform's `/auth` REST endpoints and keeps the refresh
//! token in a [`TokenStore`].

use std::sync::Arc;
use std::time::Duration;

use amp_common::{AccountCategory, Identity, VerificationStatus};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::AuthError;
use super::provider::{Credentials, IdentityProvider, Registration};
use super::token_store::TokenStore;

/// Token response from server.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[allow(dead_code)]
    expires_in: u64,
    #[allow(dead_code)]
    token_type: String,
}

/// User response from server `/auth/me` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    id: Uuid,
    username: String,
    display_name: String,
    category: String,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    verification_status: Option<String>,
}

impl TryFrom<UserResponse> for Identity {
    type Error = amp_common::Error;

    fn try_from(r: UserResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            username: r.username,
            display_name: r.display_name,
            category: r.category.parse::<AccountCategory>()?,
            verified: r.verified,
            verification_status: r
                .verification_status
                .as_deref()
                .map(str::parse::<VerificationStatus>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default)]
struct Tokens {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Identity provider backed by the platform REST API.
pub struct HttpIdentityProvider {
    http: HttpClient,
    server_url: String,
    tokens: RwLock<Tokens>,
    token_store: Arc<dyn TokenStore>,
}

impl HttpIdentityProvider {
    pub fn new(
        server_url: &str,
        timeout: Duration,
        token_store: Arc<dyn TokenStore>,
    ) -> Result<Self, AuthError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
            tokens: RwLock::new(Tokens::default()),
            token_store,
        })
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Current access token, if signed in.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.access_token.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    async fn parse_tokens(response: Response) -> Result<TokenResponse, AuthError> {
        response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            AuthError::Http(e)
        })
    }

    /// Keep the new tokens and persist the refresh token.
    async fn store_tokens(&self, tokens: &TokenResponse) {
        {
            let mut held = self.tokens.write().await;
            held.access_token = Some(tokens.access_token.clone());
            held.refresh_token = Some(tokens.refresh_token.clone());
        }

        // Continue anyway - the user is still signed in for this session
        if let Err(e) = self
            .token_store
            .save(&self.server_url, &tokens.refresh_token)
        {
            error!("Failed to store refresh token: {}", e);
        }
    }

    /// Adopt tokens from a fresh sign-in and load the account they belong to.
    ///
    /// The refresh token is persisted only once the account loads, so a
    /// failed sign-in never leaves a session behind for the next restore.
    async fn establish_session(&self, tokens: TokenResponse) -> Result<Identity, AuthError> {
        {
            let mut held = self.tokens.write().await;
            held.access_token = Some(tokens.access_token);
            held.refresh_token = Some(tokens.refresh_token.clone());
        }

        match self.fetch_identity().await {
            Ok(identity) => {
                if let Err(e) = self
                    .token_store
                    .save(&self.server_url, &tokens.refresh_token)
                {
                    error!("Failed to store refresh token: {}", e);
                }
                Ok(identity)
            }
            Err(e) => {
                error!("Failed to load account after sign-in: {}", e);
                self.forget_tokens().await;
                Err(e)
            }
        }
    }

    async fn forget_tokens(&self) {
        *self.tokens.write().await = Tokens::default();
        if let Err(e) = self.token_store.clear(&self.server_url) {
            warn!("Failed to clear stored refresh token: {}", e);
        }
    }

    async fn fetch_identity(&self) -> Result<Identity, AuthError> {
        let access_token = self
            .access_token()
            .await
            .ok_or(AuthError::NotAuthenticated)?;

        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(AuthError::NotAuthenticated),
            status => return Err(AuthError::UnexpectedStatus(status.as_u16())),
        }

        let user: UserResponse = response.json().await?;
        Ok(Identity::try_from(user)?)
    }
}

/// Extract the `error` message from a 400 response body.
fn validation_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| "Invalid input".to_string())
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        info!("Attempting login for user: {}", credentials.username);

        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({
                "username": credentials.username,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Login request failed: {}", e);
                AuthError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Login failed with status {}", status);
            return Err(if status == StatusCode::UNAUTHORIZED {
                AuthError::InvalidCredentials
            } else {
                AuthError::UnexpectedStatus(status.as_u16())
            });
        }

        let tokens = Self::parse_tokens(response).await?;

        debug!("Login successful, fetching user info");
        self.establish_session(tokens).await
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthError> {
        info!("Attempting registration for user: {}", registration.username);

        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(registration)
            .send()
            .await
            .map_err(|e| {
                error!("Registration request failed: {}", e);
                AuthError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Registration failed with status {}: {}", status, body);
            return Err(match status {
                StatusCode::CONFLICT => AuthError::UserAlreadyExists,
                StatusCode::BAD_REQUEST => AuthError::Validation(validation_message(&body)),
                _ => AuthError::UnexpectedStatus(status.as_u16()),
            });
        }

        let tokens = Self::parse_tokens(response).await?;

        debug!("Registration successful, fetching user info");
        self.establish_session(tokens).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        info!("Logging out");

        let refresh_token = self.tokens.read().await.refresh_token.clone();

        // Invalidate on the server, best effort
        let result = match refresh_token {
            Some(token) => self
                .http
                .post(self.url("/auth/logout"))
                .json(&serde_json::json!({ "refresh_token": token }))
                .send()
                .await
                .map(|_| ())
                .map_err(AuthError::from),
            None => Ok(()),
        };

        self.forget_tokens().await;
        result
    }

    async fn restore_session(&self) -> Result<Option<Identity>, AuthError> {
        let Some(refresh_token) = self.token_store.load(&self.server_url)? else {
            debug!("No stored refresh token for {}", self.server_url);
            return Ok(None);
        };

        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            info!("Stored session was rejected, signing out");
            self.forget_tokens().await;
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::UnexpectedStatus(status.as_u16()));
        }

        let tokens = Self::parse_tokens(response).await?;
        self.store_tokens(&tokens).await;
        self.fetch_identity().await.map(Some)
    }

    async fn refresh_profile(&self) -> Result<Identity, AuthError> {
        self.fetch_identity().await
    }
}
