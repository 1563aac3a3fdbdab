//! Resource gateway: one typed call per backend action
//!
//! Every call is a single HTTP request. There is no retry, batching or
//! caching here; failures go back to the page that made the call.
//!
//! Outgoing requests pass through a chain of [`RequestDecorator`]s before
//! they are sent. The storefront installs [`BearerAuth`], which attaches the
//! session credential when one is known and otherwise leaves the request
//! unauthenticated.

mod applications;
mod auth;
mod broadcast;
mod files;

use std::sync::Arc;
use std::time::Duration;

pub use reqwest::StatusCode;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, GatewayError};
use crate::model::Credential;

/// Anything that can hand out the current credential.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

/// A stage applied to every outgoing request.
pub trait RequestDecorator: Send + Sync {
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Attaches `Authorization: Bearer <token>` if a credential is present;
/// otherwise the request proceeds unauthenticated.
pub struct BearerAuth<S> {
    source: S,
}

impl<S: CredentialSource> BearerAuth<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: CredentialSource> RequestDecorator for BearerAuth<S> {
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match self.source.credential() {
            Some(credential) => request.bearer_auth(credential.expose()),
            None => request,
        }
    }
}

/// Thin REST client over `reqwest`.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    decorators: Vec<Arc<dyn RequestDecorator>>,
}

impl ApiClient {
    /// Builds a client for `base_url`.
    ///
    /// `timeout` of `None` means requests may wait forever.
    ///
    /// # Errors
    /// Returns [`GatewayError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!("vitrina/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: with_trailing_slash(base_url),
            decorators: Vec::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(config.api_url()?, config.request_timeout())?)
    }

    /// Appends a stage to the outgoing-request chain.
    pub fn with_decorator(mut self, decorator: impl RequestDecorator + 'static) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute form of a URL the backend returned.
    ///
    /// Relative paths (`/uploads/a.png`) are prefixed with the base URL;
    /// absolute URLs pass through untouched.
    pub fn resolve_asset_url(&self, url: &str) -> String {
        if Url::parse(url).is_ok() {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, GatewayError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "Gateway request");
        let request = self.http.request(method, url);
        Ok(self
            .decorators
            .iter()
            .fold(request, |request, decorator| decorator.decorate(request)))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "Gateway request failed");
            return Err(GatewayError::Status { status, body });
        }
        // An empty 2xx body decodes as JSON null.
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(GatewayError::Decode)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
