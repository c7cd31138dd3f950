//! Blocking ArchivesSpace API client.
//!
//! Requests run on a private tokio runtime, so the client can be used from
//! synchronous code such as the tree traversal. It must not be called from
//! inside another async runtime.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::node::RemoteNode;

/// Header carrying the session token after login.
pub const SESSION_HEADER: &str = "X-ArchivesSpace-Session";

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// ArchivesSpace backend client.
///
/// Cloning is cheap; clones share the HTTP pool, runtime and session.
#[derive(Clone)]
pub struct AspaceClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    session: RwLock<Option<String>>,
    runtime: Runtime,
    cancel: Option<watch::Receiver<bool>>,
}

/// Builder for AspaceClient.
#[derive(Debug)]
pub struct AspaceClientBuilder {
    base_url: String,
    timeout: Duration,
    session: Option<String>,
    cancel: Option<watch::Receiver<bool>>,
}

#[derive(Deserialize)]
struct LoginResponse {
    session: String,
}

impl fmt::Debug for AspaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspaceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.session.read().is_some())
            .finish()
    }
}

impl AspaceClient {
    /// Create a new builder for a backend at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> AspaceClientBuilder {
        AspaceClientBuilder {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            session: None,
            cancel: None,
        }
    }

    /// Create an unauthenticated client from connection settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::builder(&config.baseurl)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
    }

    /// Backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Current session token, if logged in.
    pub fn session(&self) -> Option<String> {
        self.inner.session.read().clone()
    }

    /// Authenticate and keep the session token for later requests.
    pub fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let session = self
            .inner
            .runtime
            .block_on(self.cancellable(self.request_session(username, password)))?;
        *self.inner.session.write() = Some(session);
        info!("Logged in to {} as {}", self.inner.base_url, username);
        Ok(())
    }

    /// GET a record or endpoint by its API-relative URI.
    pub fn get_json(&self, uri: &str) -> Result<Value, ClientError> {
        self.inner.runtime.block_on(self.cancellable(self.fetch(uri)))
    }

    /// Load the record at `reference`, which may be an API-relative URI or a
    /// full URL under the base URL.
    pub fn from_uri(&self, reference: &str) -> Result<RemoteNode, ClientError> {
        let uri = self.relative_uri(reference);
        let record = self.get_json(&uri)?;
        Ok(RemoteNode::new(record, self.clone()))
    }

    /// Strip the base URL from `reference` so that URIs stay in the
    /// API-relative form records use.
    pub fn relative_uri(&self, reference: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let uri = reference.strip_prefix(base).unwrap_or(reference);
        if uri.starts_with('/') {
            uri.to_string()
        } else {
            format!("/{uri}")
        }
    }

    fn endpoint(&self, uri: &str) -> Result<Url, ClientError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{uri}"))?)
    }

    /// Races `request` against the cancellation signal, if one is set.
    async fn cancellable<T>(
        &self,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        let Some(mut cancel) = self.inner.cancel.clone() else {
            return request.await;
        };

        tokio::select! {
            biased;
            Ok(_) = cancel.wait_for(|cancelled| *cancelled) => Err(ClientError::Cancelled),
            result = request => result,
        }
    }

    async fn request_session(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let url = self.endpoint(&format!("/users/{username}/login"))?;
        debug!("POST {}", url);

        let response = self
            .inner
            .http
            .post(url)
            .query(&[("password", password)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::LoginFailed {
                username: username.to_string(),
                reason: status.to_string(),
            });
        }

        let body = response.bytes().await?;
        let login: LoginResponse =
            serde_json::from_slice(&body).map_err(|e| ClientError::LoginFailed {
                username: username.to_string(),
                reason: format!("unexpected response: {e}"),
            })?;
        Ok(login.session)
    }

    async fn fetch(&self, uri: &str) -> Result<Value, ClientError> {
        let url = self.endpoint(uri)?;
        debug!("GET {}", url);

        let mut request = self.inner.http.get(url);
        if let Some(session) = self.session() {
            request = request.header(SESSION_HEADER, session);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(uri.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::HttpError {
                status,
                uri: uri.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::InvalidJson {
            uri: uri.to_string(),
            source,
        })
    }
}

impl AspaceClientBuilder {
    /// Set timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing session token instead of logging in.
    pub fn session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    /// Abort requests, including one in flight, once `cancel` turns true.
    pub fn cancel_on(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the AspaceClient.
    pub fn build(self) -> Result<AspaceClient, ClientError> {
        let base_url = Url::parse(&self.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::ClientBuildError(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ClientError::ClientBuildError(e.to_string()))?;

        Ok(AspaceClient {
            inner: Arc::new(Inner {
                http,
                base_url,
                session: RwLock::new(self.session),
                runtime,
                cancel: self.cancel,
            }),
        })
    }
}
