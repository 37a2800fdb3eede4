//! HTTP client for the Iris API.

use std::{sync::Arc, time::Duration};

use futures::StreamExt;
use reqwest::{Client, Method, Response, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    api::{errors::ApiError, sse::EventStream},
    auth::{AccessToken, TokenCell},
    config::ApiConfig,
};

const REQUEST_ID_HEADER: &str = "x-request-id";
const REFRESH_PATH: &str = "/auth/refresh";

/// Thin wrapper over `reqwest` that joins paths onto the configured base
/// URL, attaches the bearer token, and retries a request once after a
/// successful token refresh when the server answers 401.
///
/// The refresh credential is an HTTP cookie, so the client keeps a cookie
/// jar; `POST /auth/refresh` carries no body of its own.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    tokens: Arc<TokenCell>,
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig, tokens: Arc<TokenCell>) -> Result<Self, ApiError> {
        let timeout = Duration::from_secs(config.http_timeout_secs);
        let http = Client::builder()
            .cookie_store(true)
            .connect_timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout,
            tokens,
            refresh_gate: Mutex::new(()),
        })
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the response cannot
    /// be decoded.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, None, None::<&()>).await?;

        read_json(path, response).await
    }

    /// `GET` a JSON resource with a query string.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the response cannot
    /// be decoded.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .execute(Method::GET, path, Some(query), None::<&()>)
            .await?;

        read_json(path, response).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the response cannot
    /// be decoded.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::POST, path, None, Some(body)).await?;

        read_json(path, response).await
    }

    /// `POST` without a body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the response cannot
    /// be decoded.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::POST, path, None, None::<&()>).await?;

        read_json(path, response).await
    }

    /// `POST` a JSON body, ignoring whatever the server responds with.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn post_discard<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.execute(Method::POST, path, None, Some(body)).await?;

        Ok(())
    }

    /// `POST` without a body, ignoring whatever the server responds with.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn post_empty_discard(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::POST, path, None, None::<&()>).await?;

        Ok(())
    }

    /// `PATCH` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the response cannot
    /// be decoded.
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::PATCH, path, None, Some(body)).await?;

        read_json(path, response).await
    }

    /// `DELETE` a resource and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the response cannot
    /// be decoded.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::DELETE, path, None, None::<&()>).await?;

        read_json(path, response).await
    }

    /// Opens a `text/event-stream` connection.
    ///
    /// The connection gets the same auth handling as regular requests but no
    /// request timeout, since it stays open until either side closes it.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the connection cannot be established.
    pub async fn events(&self, path: &str) -> Result<EventStream, ApiError> {
        let url = self.endpoint(path);
        let mut refreshed = false;

        loop {
            let mut request = self
                .http
                .get(url.as_str())
                .header(header::ACCEPT, "text/event-stream")
                .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string());

            let token = self.tokens.current();

            if let Some(token) = &token {
                request = request.bearer_auth(token.reveal());
            }

            let response = request
                .send()
                .await
                .map_err(|source| ApiError::transport(path, source))?;

            if response.status() == StatusCode::UNAUTHORIZED && token.is_some() && !refreshed {
                self.refresh_access_token().await?;
                refreshed = true;

                continue;
            }

            if !response.status().is_success() {
                return Err(error_for_status(path, response, token.is_some()).await);
            }

            let path = path.to_owned();
            let chunks = response.bytes_stream().map(move |chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|source| ApiError::transport(&path, source))
            });

            return Ok(EventStream::new(chunks));
        }
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(path);
        let mut refreshed = false;

        loop {
            let mut request = self
                .http
                .request(method.clone(), url.as_str())
                .timeout(self.timeout)
                .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string());

            if let Some(query) = query {
                request = request.query(query);
            }

            if let Some(body) = body {
                request = request.json(body);
            }

            let token = self.tokens.current();

            if let Some(token) = &token {
                request = request.bearer_auth(token.reveal());
            }

            let response = request
                .send()
                .await
                .map_err(|source| ApiError::transport(path, source))?;

            // One transparent refresh-and-retry per request, and only when a
            // token was attached: a 401 on an anonymous call (say, a failed
            // login) is final.
            if response.status() == StatusCode::UNAUTHORIZED && token.is_some() && !refreshed {
                tracing::debug!(path, "unauthorized, refreshing access token");
                self.refresh_access_token().await?;
                refreshed = true;

                continue;
            }

            if !response.status().is_success() {
                return Err(error_for_status(path, response, token.is_some()).await);
            }

            return Ok(response);
        }
    }

    /// Refreshes the access token, sharing one in-flight refresh between
    /// concurrent callers.
    ///
    /// Callers queue on the gate; whoever enters first performs the refresh,
    /// and the generation check lets everyone queued behind it reuse that
    /// result instead of refreshing again.
    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let observed = self.tokens.generation();
        let _guard = self.refresh_gate.lock().await;

        if self.tokens.generation() != observed {
            return Ok(());
        }

        let url = self.endpoint(REFRESH_PATH);
        let response = self
            .http
            .post(url.as_str())
            .timeout(self.timeout)
            .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string())
            .send()
            .await
            .map_err(|source| ApiError::transport(REFRESH_PATH, source))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "token refresh rejected");
            self.tokens.clear();

            return Err(ApiError::SessionExpired);
        }

        let parsed: RefreshResponse = read_json(REFRESH_PATH, response).await?;

        self.tokens.set(AccessToken::new(parsed.access_token));

        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn read_json<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|source| ApiError::transport(path, source))?;

    serde_json::from_str(&text).map_err(|source| ApiError::decode(path, source))
}

async fn error_for_status(path: &str, response: Response, authed: bool) -> ApiError {
    let status = response.status();
    let message = response.text().await.unwrap_or_default();

    if status == StatusCode::UNAUTHORIZED && authed {
        return ApiError::SessionExpired;
    }

    ApiError::Status {
        path: path.to_owned(),
        status,
        message,
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use testresult::TestResult;

    use super::*;
    use crate::test::TestContext;

    #[tokio::test]
    async fn an_expired_token_is_refreshed_and_the_call_retried() -> TestResult {
        let context = TestContext::signed_in().await;
        context.stub.expire_access_tokens();

        let products: Value = context.api.get("/api/products").await?;

        assert_eq!(products, serde_json::json!([]));
        assert_eq!(context.stub.request_count("POST", "/auth/refresh"), 1);
        assert!(context.tokens.is_present());

        Ok(())
    }

    #[tokio::test]
    async fn a_revoked_refresh_expires_the_session() -> TestResult {
        let context = TestContext::signed_in().await;
        context.stub.expire_access_tokens();
        context.stub.revoke_refresh();

        let result = context.api.get::<Value>("/api/products").await;

        assert!(matches!(result, Err(ApiError::SessionExpired)));
        assert!(!context.tokens.is_present());

        Ok(())
    }

    #[tokio::test]
    async fn an_anonymous_rejection_is_a_plain_status_error() -> TestResult {
        let context = TestContext::new().await;

        let result = context.api.get::<Value>("/api/products").await;

        match result {
            Err(ApiError::Status { status, .. }) => assert_eq!(status, 401),
            other => return Err(format!("expected a status error, got {other:?}").into()),
        }

        assert_eq!(context.stub.request_count("POST", "/auth/refresh"), 0);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_rejections_share_one_refresh() -> TestResult {
        let context = TestContext::signed_in().await;
        context.stub.expire_access_tokens();

        let (products, categories) = tokio::join!(
            context.api.get::<Value>("/api/products"),
            context.api.get::<Value>("/api/shop/categories"),
        );

        products?;
        categories?;
        assert_eq!(context.stub.request_count("POST", "/auth/refresh"), 1);

        Ok(())
    }
}
