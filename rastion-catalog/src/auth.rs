//! Auth operations against the hub's `/auth` endpoints.
//!
//! The hub signs users in through GitHub OAuth: the service hands out the
//! OAuth URL, the browser flow yields a GitHub token, and the hub exchanges
//! that for its own access token. The client only moves tokens around; it
//! never inspects them.

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::HubClient;
use crate::error::HubClientError;
use crate::types::User;

const LOGIN_URL_FALLBACK: &str = "Unable to start sign-in.";
const LOGIN_FALLBACK: &str = "Unable to sign in.";
const VERIFY_FALLBACK: &str = "Unable to verify token.";
const PROFILE_FALLBACK: &str = "Unable to load profile.";

/// A signed-in session as returned by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Result of checking a stored token against the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenVerification {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<User>,
}

impl TokenVerification {
    fn invalid() -> Self {
        Self {
            valid: false,
            user: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginUrlResponse {
    url: String,
}

#[derive(Debug, Serialize)]
struct VerifyPayload<'a> {
    token: &'a str,
}

impl HubClient {
    /// GitHub OAuth URL to open in a browser to start sign-in.
    #[instrument(skip_all)]
    pub async fn login_url(&self) -> Result<url::Url, HubClientError> {
        let endpoint = self.endpoint(["auth", "login"]);
        let response = self.get_response(endpoint).await?;
        let payload: LoginUrlResponse = self.decode(response, LOGIN_URL_FALLBACK).await?;
        url::Url::parse(&payload.url).map_err(|_| HubClientError::Malformed {
            message: LOGIN_URL_FALLBACK.to_string(),
        })
    }

    /// Exchange a GitHub token for a hub session.
    ///
    /// The GitHub token authenticates this one request; it is not stored on
    /// the client.
    #[instrument(skip_all)]
    pub async fn login(&self, github_token: &str) -> Result<Session, HubClientError> {
        let bearer = header::HeaderValue::from_str(&format!("bearer {github_token}"))
            .map_err(|_| HubClientError::InvalidRequest("Malformed token.".to_string()))?;
        let response = self
            .http()
            .post(self.endpoint(["auth", "login"]))
            .header(header::AUTHORIZATION, bearer)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        self.decode(response, LOGIN_FALLBACK).await
    }

    /// Check whether a stored access token is still valid.
    ///
    /// Blank tokens are invalid by definition and issue no request.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, token: &str) -> Result<TokenVerification, HubClientError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(TokenVerification::invalid());
        }

        let response = self
            .http()
            .post(self.endpoint(["auth", "token"]))
            .json(&VerifyPayload { token })
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        self.decode(response, VERIFY_FALLBACK).await
    }

    /// The user the configured access token belongs to.
    #[instrument(skip_all)]
    pub async fn current_user(&self) -> Result<User, HubClientError> {
        let endpoint = self.endpoint(["auth", "me"]);
        let response = self.get_response(endpoint).await?;
        self.decode(response, PROFILE_FALLBACK).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::config::HubClientConfig;

    fn client(url: &str) -> HubClient {
        HubClient::new(HubClientConfig {
            catalog_url: Some(url.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn user_json() -> serde_json::Value {
        json!({"id": 9, "username": "ada", "avatar_url": "https://example.com/a.png"})
    }

    #[tokio::test]
    async fn login_url_parses_the_oauth_url() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/auth/login");
            then.status(200)
                .json_body(json!({"url": "https://github.com/login/oauth/authorize?client_id=x"}));
        });

        let url = client(&server.base_url()).login_url().await.unwrap();
        assert_eq!(url.host_str(), Some("github.com"));
        mock.assert();
    }

    #[tokio::test]
    async fn login_sends_the_github_token_as_bearer() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .header("authorization", "bearer gh-token");
            then.status(200).json_body(json!({
                "access_token": "hub-token",
                "token_type": "bearer",
                "user": user_json(),
            }));
        });

        let session = client(&server.base_url()).login("gh-token").await.unwrap();
        assert_eq!(session.access_token, "hub-token");
        assert_eq!(session.user.username, "ada");
        mock.assert();
    }

    #[tokio::test]
    async fn blank_tokens_are_invalid_without_a_request() {
        let server = MockServer::start_async().await;
        let verification = client(&server.base_url())
            .verify_token("   ")
            .await
            .unwrap();
        assert!(!verification.valid);
        assert!(verification.user.is_none());
    }

    #[tokio::test]
    async fn verify_token_round_trips() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/token")
                .json_body(json!({"token": "stored-token"}));
            then.status(200)
                .json_body(json!({"valid": true, "user": user_json()}));
        });

        let verification = client(&server.base_url())
            .verify_token(" stored-token ")
            .await
            .unwrap();
        assert!(verification.valid);
        assert_eq!(verification.user.unwrap().id, 9);
        mock.assert();
    }

    #[tokio::test]
    async fn current_user_surfaces_auth_errors() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/auth/me");
            then.status(401)
                .json_body(json!({"detail": "Missing bearer token."}));
        });

        let err = client(&server.base_url()).current_user().await.unwrap_err();
        assert_eq!(err.to_string(), "Missing bearer token.");
        mock.assert();
    }
}
