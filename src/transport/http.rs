//! HTTP transport backed by reqwest.

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, Method, Request};

use crate::config::HttpConfig;
use crate::error::TransportError;
use crate::key::RequestKey;

use super::Transport;

/// Performs requests over HTTP.
///
/// Method, headers and body come from the key's
/// [`RequestOptions`](crate::key::RequestOptions). Any non-2xx status is
/// reported as [`TransportError::Status`] and its body is discarded.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fetchstate::prelude::*;
///
/// # fn main() -> Result<(), fetchstate::error::TransportError> {
/// let transport = Arc::new(HttpTransport::new()?);
/// let manager: FetchStateManager<serde_json::Value> =
///     FetchStateManager::new(RequestCache::new(), transport);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Creates a transport with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built (for
    /// example when no TLS backend is available).
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpConfig::default())
    }

    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn with_config(config: HttpConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Wraps an existing client. The config's `user_agent` and
    /// `connect_timeout` are ignored; its default headers still apply.
    #[must_use]
    pub const fn with_client(client: Client, config: HttpConfig) -> Self {
        Self { client, config }
    }

    pub const fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn build_request(&self, key: &RequestKey) -> Result<Request, TransportError> {
        let options = key.options();
        let method = Method::from_bytes(options.method.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut builder = self.client.request(method, key.url());
        for (name, value) in &self.config.default_headers {
            if !options.headers.contains_key(name) {
                builder = builder.header(name, value);
            }
        }
        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        builder
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn perform_request(&self, key: &RequestKey) -> BoxFuture<'static, Result<Bytes, TransportError>> {
        let client = self.client.clone();
        let request = self.build_request(key);

        async move {
            let response = client
                .execute(request?)
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            response
                .bytes()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))
        }
        .boxed()
    }
}
