//! Retrieval transports.
//!
//! A [`Transport`] turns a [`RequestKey`] into a raw response body. The
//! manager treats it as an opaque capability: anything that reports
//! non-success responses as errors satisfies the contract.
//!
//! - [`http::HttpTransport`]: reqwest-backed HTTP client
//! - [`mock::MockTransport`]: controllable transport for tests
//! - any `Fn(&RequestKey) -> BoxFuture<'static, Result<Bytes, TransportError>>`

pub mod http;
pub mod mock;

use bytes::Bytes;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use crate::error::{DecodeError, TransportError};
use crate::key::RequestKey;

/// Performs the retrieval for a key and returns the raw body.
///
/// The returned future must not borrow from `self` or `key`; managers spawn
/// it onto the runtime alongside other in-flight retrievals.
pub trait Transport: Send + Sync {
    fn perform_request(&self, key: &RequestKey) -> BoxFuture<'static, Result<Bytes, TransportError>>;
}

impl<F> Transport for F
where
    F: Fn(&RequestKey) -> BoxFuture<'static, Result<Bytes, TransportError>> + Send + Sync,
{
    fn perform_request(&self, key: &RequestKey) -> BoxFuture<'static, Result<Bytes, TransportError>> {
        self(key)
    }
}

/// Decodes a JSON response body.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the body is not valid JSON for `T`.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}
