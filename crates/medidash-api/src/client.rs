//! # API Gateway Client
//!
//! The single HTTP client every server-backed command goes through.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Lifecycle                                │
//! │                                                                         │
//! │  command ──► ApiClient::get/post/patch                                  │
//! │                 │                                                       │
//! │                 ├─ join path onto base URL                              │
//! │                 ├─ Authorization: Bearer <accessToken> (if stored)      │
//! │                 ▼                                                       │
//! │              reqwest ──► backend                                        │
//! │                 │                                                       │
//! │                 ├─ 2xx  ──► ApiEnvelope<T>                              │
//! │                 ├─ 401  ──► clear credentials, Unauthorized             │
//! │                 ├─ 403  ──► error toast, Forbidden                      │
//! │                 └─ else ──► Http { status, server message }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A 401 does not redirect and does not try the refresh token. The next
//! navigation finds no access token and the route guard sends the user to
//! the login page.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::credentials::CredentialStore;
use crate::envelope::{ApiEnvelope, ErrorBody};
use crate::error::{ApiResult, ClientError};
use crate::notify::Notifier;

const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    credentials: CredentialStore,
    notifier: Notifier,
}

impl ApiClient {
    /// Builds the client from settings.
    ///
    /// The base URL always gets a trailing slash so relative paths join
    /// beneath it rather than replacing its last segment.
    pub fn new(
        settings: &ApiSettings,
        credentials: CredentialStore,
        notifier: Notifier,
    ) -> ApiResult<Self> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(ClientError::from)?;

        debug!(base_url = %base_url, "API client ready");
        Ok(ApiClient {
            http,
            base_url,
            credentials,
            notifier,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.url(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.credentials.access_token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(builder)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiEnvelope<T>> {
        let builder = self.request(Method::GET, path)?;
        self.send(path, builder).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        self.send(path, builder).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<ApiEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(path, builder).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<ApiEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PATCH, path)?.json(body);
        self.send(path, builder).await
    }

    // =========================================================================
    // Response handling
    // =========================================================================

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> ApiResult<ApiEnvelope<T>> {
        let response = builder.send().await.map_err(|e| {
            warn!(path, error = %e, "Request did not reach the server");
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(path, status = status.as_u16(), bytes = body.len(), "Response received");

        if status.is_success() {
            if body.is_empty() {
                return Ok(ApiEnvelope {
                    success: true,
                    message: None,
                    data: None,
                    meta: None,
                });
            }
            return Ok(serde_json::from_slice(&body)?);
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        Err(self.intercept(path, status, message))
    }

    fn intercept(&self, path: &str, status: StatusCode, message: Option<String>) -> ClientError {
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!(path, "Unauthorized, clearing stored credentials");
                self.credentials.clear();
                ClientError::Unauthorized
            }
            StatusCode::FORBIDDEN => {
                let message = message.unwrap_or_else(|| FORBIDDEN_MESSAGE.to_string());
                warn!(path, %message, "Forbidden");
                self.notifier.error(message.clone());
                ClientError::Forbidden { message }
            }
            other => {
                let message = message.unwrap_or_else(|| {
                    other
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
                debug!(path, status = other.as_u16(), %message, "Request failed");
                ClientError::Http {
                    status: other.as_u16(),
                    message,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        let settings = ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        };
        ApiClient::new(&settings, CredentialStore::new(), Notifier::new()).unwrap()
    }

    #[test]
    fn test_paths_join_under_base() {
        let c = client("http://localhost:4000/api");
        assert_eq!(c.url("/stores").unwrap().as_str(), "http://localhost:4000/api/stores");
        assert_eq!(
            c.url("register/active").unwrap().as_str(),
            "http://localhost:4000/api/register/active"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = ApiSettings {
            base_url: "not a url".into(),
            ..ApiSettings::default()
        };
        let err = ApiClient::new(&settings, CredentialStore::new(), Notifier::new()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_intercept_401_clears_credentials() {
        let c = client("http://localhost:4000/api/");
        c.credentials().set_tokens("acc", "ref");

        let err = c.intercept("/users", StatusCode::UNAUTHORIZED, None);
        assert!(matches!(err, ClientError::Unauthorized));
        assert!(!c.credentials().has_access_token());
    }

    #[test]
    fn test_intercept_other_status_uses_reason() {
        let c = client("http://localhost:4000/api/");
        match c.intercept("/x", StatusCode::CONFLICT, None) {
            ClientError::Http { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Conflict");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
