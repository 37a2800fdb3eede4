//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::{
    api::ApiClient,
    auth::{
        errors::AuthServiceError,
        models::UserIdentity,
        session::{SessionStore, StoredSession},
        tokens::{AccessToken, TokenCell},
    },
};

#[derive(Debug)]
pub struct HttpAuthService {
    api: Arc<ApiClient>,
    tokens: Arc<TokenCell>,
    sessions: SessionStore,
}

impl HttpAuthService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, tokens: Arc<TokenCell>, sessions: SessionStore) -> Self {
        Self {
            api,
            tokens,
            sessions,
        }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, AuthServiceError> {
        let response: LoginResponse = self
            .api
            .post("/auth/login", &LoginRequest { email, password })
            .await?;

        let token = AccessToken::new(response.access_token);

        self.tokens.set(token.clone());

        // Some deployments return the user inline, some only the token.
        let user = match response.user {
            Some(user) => user,
            None => self.api.get("/auth/me").await?,
        };

        self.sessions
            .save(&StoredSession::new(token, user.clone()))?;

        Ok(user)
    }

    async fn logout(&self) -> Result<(), AuthServiceError> {
        self.api.post_empty_discard("/auth/logout").await?;

        self.tokens.clear();
        self.sessions.clear()?;

        Ok(())
    }

    async fn me(&self) -> Result<UserIdentity, AuthServiceError> {
        let user = self.api.get("/auth/me").await?;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Signs in with email and password, caching the access token and
    /// persisting the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidCredentials`] when the server
    /// rejects the pair, or another [`AuthServiceError`] for transport and
    /// persistence failures.
    async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, AuthServiceError>;

    /// Signs out on the server, then drops the cached token and the
    /// persisted session.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthServiceError`] if the server call or the session
    /// cleanup fails.
    async fn logout(&self) -> Result<(), AuthServiceError>;

    /// Fetches the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthServiceError`] if the request fails or nobody is
    /// signed in.
    async fn me(&self) -> Result<UserIdentity, AuthServiceError>;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(default)]
    user: Option<UserIdentity>,
}
