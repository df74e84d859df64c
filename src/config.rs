use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for [`HttpTransport`](crate::transport::http::HttpTransport).
///
/// This controls the client-level defaults applied to every request. Headers
/// set in a key's [`RequestOptions`](crate::key::RequestOptions) take
/// precedence over `default_headers`.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Value sent in the `user-agent` header.
    pub user_agent: String,

    /// Headers sent with every request unless the request overrides them.
    pub default_headers: BTreeMap<String, String>,

    /// Upper bound on establishing a connection.
    ///
    /// This only bounds the transport. A request that connects but never
    /// answers stays `Loading` until it resolves or is superseded.
    pub connect_timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("accept".to_string(), "application/json".to_string());
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers,
            connect_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl HttpConfig {
    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a default header. Header names are stored lowercase.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the connect timeout; `None` leaves it unbounded.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
