//! Mock transport for testing.
//!
//! [`MockTransport`] records every request and lets the test decide when and
//! how each one completes, enabling deterministic tests of completion order
//! without real I/O.
//!
//! # Canned responses
//!
//! ```
//! use fetchstate::key::RequestKey;
//! use fetchstate::transport::mock::MockTransport;
//!
//! let mock = MockTransport::new();
//! mock.respond_json(RequestKey::new("/posts/1"), &serde_json::json!({ "id": 1 }));
//! mock.respond_status(RequestKey::new("/posts/2"), 404);
//! ```
//!
//! # Controlled completion
//!
//! Requests for keys without a canned response stay pending until the test
//! calls [`MockTransport::complete`]:
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use fetchstate::key::RequestKey;
//! use fetchstate::transport::{Transport, mock::MockTransport};
//!
//! let mock = MockTransport::new();
//! let key = RequestKey::new("/slow");
//! let response = mock.perform_request(&key);
//! assert_eq!(mock.pending_count(), 1);
//!
//! mock.complete(&key, Ok(bytes::Bytes::from_static(b"42")));
//! assert_eq!(response.await, Ok(bytes::Bytes::from_static(b"42")));
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::error::TransportError;
use crate::key::RequestKey;

use super::Transport;

type Response = Result<Bytes, TransportError>;

#[derive(Default)]
struct Inner {
    calls: Vec<RequestKey>,
    canned: HashMap<RequestKey, Response>,
    pending: VecDeque<(RequestKey, oneshot::Sender<Response>)>,
}

/// A transport whose responses are scripted by the test.
///
/// Cloning shares the same script and call log, so one clone can be handed to
/// a manager while the test keeps another.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answers every future request for `key` immediately with `response`.
    pub fn respond_with(&self, key: RequestKey, response: Response) {
        self.lock().canned.insert(key, response);
    }

    /// Answers requests for `key` with `value` serialized as JSON.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be serialized.
    pub fn respond_json(&self, key: RequestKey, value: &impl Serialize) {
        let body = serde_json::to_vec(value).expect("mock response should serialize");
        self.respond_with(key, Ok(Bytes::from(body)));
    }

    /// Answers requests for `key` with a non-success status.
    pub fn respond_status(&self, key: RequestKey, status: u16) {
        self.respond_with(
            key,
            Err(TransportError::Status {
                status,
                reason: String::new(),
            }),
        );
    }

    /// Completes the oldest pending request for `key`.
    ///
    /// Returns `false` if no request for `key` was pending.
    pub fn complete(&self, key: &RequestKey, response: Response) -> bool {
        let mut inner = self.lock();
        let Some(index) = inner.pending.iter().position(|(k, _)| k == key) else {
            return false;
        };
        let Some((_, tx)) = inner.pending.remove(index) else {
            return false;
        };
        // the requester may already be gone
        let _ = tx.send(response);
        true
    }

    /// Every key requested so far, in request order.
    #[must_use]
    pub fn calls(&self) -> Vec<RequestKey> {
        self.lock().calls.clone()
    }

    /// How many times `key` has been requested.
    #[must_use]
    pub fn call_count(&self, key: &RequestKey) -> usize {
        self.lock().calls.iter().filter(|k| *k == key).count()
    }

    /// Number of requests waiting for [`complete`](Self::complete).
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }
}

impl Transport for MockTransport {
    fn perform_request(&self, key: &RequestKey) -> BoxFuture<'static, Response> {
        let mut inner = self.lock();
        inner.calls.push(key.clone());

        if let Some(response) = inner.canned.get(key) {
            let response = response.clone();
            return async move { response }.boxed();
        }

        let (tx, rx) = oneshot::channel();
        inner.pending.push_back((key.clone(), tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(TransportError::Network("mock transport dropped".to_string())))
        }
        .boxed()
    }
}
