//! Request identity.
//!
//! A [`RequestKey`] is the URL plus the options that shape the request. Two
//! equal keys are assumed to produce equivalent results, which is what makes
//! caching by key sound.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Options that shape a request beyond its URL.
///
/// Headers are kept in a `BTreeMap` so that option sets which differ only in
/// insertion order compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestOptions {
    pub method: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// Creates options for the given HTTP method.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            ..Self::default()
        }
    }

    /// Adds a header. Header names are stored lowercase.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns `true` when these are plain `GET` options with nothing else set.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Identity of a logical request: a URL plus its [`RequestOptions`].
///
/// # Example
///
/// ```
/// use fetchstate::key::{RequestKey, RequestOptions};
///
/// let plain = RequestKey::new("https://api.example.com/posts/1");
/// let same = RequestKey::new("https://api.example.com/posts/1")
///     .with_options(RequestOptions::default());
/// assert_eq!(plain, same);
///
/// let authed = plain.clone().with_options(
///     RequestOptions::default().header("x-trace", "1"),
/// );
/// assert_ne!(plain, authed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    url: String,
    options: RequestOptions,
}

impl RequestKey {
    /// Creates a `GET` key for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: RequestOptions::default(),
        }
    }

    /// Replaces the options of this key.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub const fn options(&self) -> &RequestOptions {
        &self.options
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_default() {
            return f.write_str(&self.url);
        }
        // serializing a struct of strings cannot fail
        let options = serde_json::to_string(&self.options).unwrap_or_default();
        write!(f, "{} {}", self.url, options)
    }
}

impl From<&str> for RequestKey {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for RequestKey {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_options() {
        let options = RequestOptions::default();
        assert_eq!(options.method, "GET");
        assert!(options.headers.is_empty());
        assert!(options.body.is_none());
        assert!(options.is_default());
    }

    #[test]
    fn test_method_is_uppercased() {
        assert_eq!(RequestOptions::new("post").method, "POST");
    }

    #[test]
    fn test_header_order_does_not_affect_identity() {
        let a = RequestOptions::default()
            .header("Accept", "application/json")
            .header("X-Trace", "1");
        let b = RequestOptions::default()
            .header("x-trace", "1")
            .header("accept", "application/json");
        assert_eq!(a, b);

        let mut keys = HashSet::new();
        keys.insert(RequestKey::new("/posts").with_options(a));
        keys.insert(RequestKey::new("/posts").with_options(b));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_options_distinguish_keys() {
        let get = RequestKey::new("/posts");
        let post = RequestKey::new("/posts").with_options(RequestOptions::new("POST").body("{}"));
        assert_ne!(get, post);
    }

    #[test]
    fn test_display() {
        let key = RequestKey::from("https://api/posts/1");
        assert_eq!(key.to_string(), "https://api/posts/1");

        let key = key.with_options(RequestOptions::new("DELETE"));
        assert_eq!(key.to_string(), r#"https://api/posts/1 {"method":"DELETE"}"#);
    }
}
