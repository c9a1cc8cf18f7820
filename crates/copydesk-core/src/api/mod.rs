//! REST API client.
//!
//! All traffic to the content API flows through [`ApiClient::execute`], which
//! applies the two cross-cutting hooks:
//!
//! - outgoing: attach the session's bearer token when one is present;
//! - incoming: a 401 clears the session (token AND profile) and surfaces as
//!   a `SessionExpired` error — the caller still observes the failure, the
//!   session cleanup is layered on top of normal propagation.
//!
//! There is no per-call opt-out and no retry policy; failures are surfaced
//! once and left to the caller.

pub mod auth;
pub mod categories;
pub mod error;
pub mod files;
pub mod posts;
pub mod response;
pub mod tags;
pub mod users;

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use response::{ApiEnvelope, Page};

use crate::config::Config;
use crate::session::SessionStore;

/// Client for the content API.
///
/// Owns the HTTP client and a handle to the session store, which it reads
/// for the outgoing bearer token and writes on session expiry.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a new client for the configured API.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.http.patch(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Sends a request through the hook pair and decodes the envelope.
    ///
    /// Every endpoint method funnels through here; this is what makes the
    /// auth header and 401 handling uniform instead of per-call.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> ApiResult<ApiEnvelope<T>> {
        let request_id = Uuid::new_v4();
        let builder = self.authorize(builder);

        tracing::debug!(%request_id, "sending API request");
        let response = builder.send().await.map_err(ApiError::from)?;
        self.intercept(request_id, response).await
    }

    /// Outgoing hook: attach the bearer credential if a token is present,
    /// otherwise forward the request unmodified.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Incoming hook: map the response to an envelope or an error.
    ///
    /// A 401 clears the session before the error is returned, so the caller
    /// observes both the cleanup and the original failure.
    async fn intercept<T: DeserializeOwned>(
        &self,
        request_id: Uuid,
        response: Response,
    ) -> ApiResult<ApiEnvelope<T>> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%request_id, "authorization failure, clearing session");
            if let Err(err) = self.session.clear() {
                tracing::warn!(%request_id, error = %err, "failed to clear durable session");
            }
            return Err(ApiError::session_expired(&body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%request_id, status = status.as_u16(), "API request failed");
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        let body = response.text().await.map_err(ApiError::from)?;
        response::decode_envelope(&body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::session::Role;

    async fn client_for(server: &MockServer) -> (tempfile::TempDir, Arc<SessionStore>, ApiClient) {
        let dir = tempfile::tempdir().unwrap();
        let session =
            Arc::new(SessionStore::load_from(dir.path().join("session.json")).unwrap());
        let config = Config {
            api_base_url: server.uri(),
            ..Config::default()
        };
        let client = ApiClient::new(&config, Arc::clone(&session)).unwrap();
        (dir, session, client)
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "success": true,
            "message": null,
            "data": {
                "_id": "u-1",
                "full_name": "Jane Doe",
                "email": "jane@example.com",
                "date_of_birth": null,
                "role": "admin",
                "locked": false,
                "created_at": "2026-01-01T00:00:00Z",
                "updated_at": "2026-01-01T00:00:00Z"
            }
        })
    }

    #[tokio::test]
    async fn bearer_header_present_iff_token_is_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .mount(&server)
            .await;
        let (_dir, session, client) = client_for(&server).await;

        // No token: no Authorization header at all.
        client.get_profile().await.unwrap();

        session.set_token(Some("tok-123".to_string())).unwrap();
        client.get_profile().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].headers.contains_key("authorization"));
        assert_eq!(
            requests[1].headers.get("authorization").unwrap(),
            "Bearer tok-123"
        );
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session_and_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Token expired",
                "data": null
            })))
            .mount(&server)
            .await;
        let (_dir, session, client) = client_for(&server).await;
        session.set_token(Some("stale".to_string())).unwrap();
        session.set_profile(Some(crate::session::UserProfile {
            id: "u-1".to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            date_of_birth: None,
            role: Role::Admin,
            locked: false,
            created_at: String::new(),
            updated_at: String::new(),
        }));

        // Caller still observes the failure...
        let err = client.get_profile().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::SessionExpired);
        assert_eq!(err.message, "Token expired");

        // ...and the session was cleared as a side effect.
        assert_eq!(session.token(), None);
        assert_eq!(session.profile(), None);
    }

    #[tokio::test]
    async fn failure_envelope_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Invalid credentials",
                "data": null
            })))
            .mount(&server)
            .await;
        let (_dir, _session, client) = client_for(&server).await;

        let err = client
            .login(&auth::LoginRequest {
                email: "jane@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Api);
        assert_eq!(err.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;
        let (_dir, session, client) = client_for(&server).await;
        session.set_token(Some("tok".to_string())).unwrap();

        let err = client.get_profile().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        // A non-401 failure must NOT touch the session.
        assert!(session.token().is_some());
    }
}
