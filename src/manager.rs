//! The fetch state manager.
//!
//! [`FetchStateManager`] tracks one logical request at a time. Binding a key
//! consults the shared [`RequestCache`]; a hit resolves synchronously, a miss
//! moves to `Loading` and yields a [`Retrieval`] for the host to drive.
//!
//! # Stale responses
//!
//! Completion order is not issue order. A slow response for an earlier key can
//! arrive after a fast response for a later one. Every retrieval therefore
//! carries a [`PendingOperation`] whose token is cancelled when the manager
//! moves on (rebind, unbind, [`detach`](FetchStateManager::detach) or drop).
//! A cancelled completion is discarded: no state transition and no cache
//! write.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fetchstate::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Clone, Deserialize)]
//! struct Post {
//!     id: u32,
//!     title: String,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = RequestCache::new();
//! let transport = Arc::new(HttpTransport::new()?);
//! let mut manager: FetchStateManager<Post> = FetchStateManager::new(cache, transport);
//!
//! manager
//!     .bind(Some(RequestKey::new("https://jsonplaceholder.typicode.com/posts/1")))
//!     .await;
//!
//! match manager.current_state() {
//!     FetchState::Fetched(post) => println!("{}", post.title),
//!     FetchState::Failed(e) => eprintln!("{e}"),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use crate::cache::RequestCache;
use crate::error::FetchError;
use crate::key::RequestKey;
use crate::operation::{PendingOperation, Retrieval};
use crate::state::{FetchEvent, FetchState};
use crate::transport::{Transport, decode_json};

/// Tracks the fetch lifecycle of the key currently bound to it.
pub struct FetchStateManager<T> {
    cache: RequestCache,
    transport: Arc<dyn Transport>,
    state: Arc<watch::Sender<FetchState<T>>>,
    key: Option<RequestKey>,
    pending: Option<PendingOperation>,
}

impl<T> FetchStateManager<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates an idle manager that shares `cache` and retrieves through
    /// `transport`.
    pub fn new(cache: RequestCache, transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            cache,
            transport,
            state: Arc::new(state),
            key: None,
            pending: None,
        }
    }

    /// Declares the request this manager should track.
    ///
    /// Any pending operation is cancelled first, including one for the same
    /// key: rebinding always restarts rather than joining an in-flight
    /// request.
    ///
    /// - `None` moves to `Idle` and starts nothing.
    /// - A cached key moves straight to `Fetched` without passing through
    ///   `Loading`.
    /// - Otherwise the state moves to `Loading` and the returned
    ///   [`Retrieval`] performs the request when driven.
    ///
    /// Errors are never returned from here; they surface as
    /// [`FetchState::Failed`] once the retrieval completes.
    pub fn bind(&mut self, key: Option<RequestKey>) -> Retrieval {
        self.cancel_pending();

        let Some(key) = key else {
            debug!("unbinding");
            self.key = None;
            self.state.send_replace(FetchState::Idle);
            return Retrieval::none();
        };

        self.key = Some(key.clone());

        if let Some(data) = self.cache.get::<T>(&key) {
            debug!(%key, "cache hit");
            self.transition(FetchEvent::Succeeded(data));
            return Retrieval::none();
        }

        debug!(%key, "cache miss, starting retrieval");
        self.transition(FetchEvent::StartLoading);

        let operation = PendingOperation::new(key);
        let request = self.transport.perform_request(operation.key());
        let cache = self.cache.clone();
        let state = Arc::clone(&self.state);
        let guard = operation.clone();
        self.pending = Some(operation);

        Retrieval::new(async move {
            let outcome = match request.await {
                Ok(body) => decode_json::<T>(&body).map_err(FetchError::from),
                Err(e) => Err(FetchError::from(e)),
            };
            complete(&state, &cache, &guard, outcome);
        })
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Subscribes to state transitions.
    ///
    /// The receiver sees the current state immediately and is notified on
    /// every later transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Stream of states, starting with the current one.
    ///
    /// Intermediate states may be skipped if the consumer falls behind; the
    /// latest state is always delivered.
    pub fn states(&self) -> BoxStream<'static, FetchState<T>> {
        WatchStream::new(self.subscribe()).boxed()
    }

    fn transition(&self, event: FetchEvent<T>) {
        self.state
            .send_modify(|state| *state = mem::replace(state, FetchState::Idle).reduce(event));
    }
}

impl<T> FetchStateManager<T> {
    /// Stops caring about the pending retrieval, if any.
    ///
    /// The observed state is left as it is; the in-flight request keeps
    /// running but its completion is discarded.
    pub fn detach(&mut self) {
        if self.pending.is_some() {
            debug!(key = ?self.key, "detaching");
        }
        self.cancel_pending();
    }

    /// The key currently bound, if any.
    pub const fn key(&self) -> Option<&RequestKey> {
        self.key.as_ref()
    }

    /// Returns `true` while a retrieval for the bound key has not completed.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|op| !op.is_cancelled() && self.state.borrow().is_loading())
    }

    pub const fn cache(&self) -> &RequestCache {
        &self.cache
    }

    fn cancel_pending(&mut self) {
        if let Some(operation) = self.pending.take() {
            operation.cancel();
        }
    }
}

impl<T> Drop for FetchStateManager<T> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl<T: fmt::Debug> fmt::Debug for FetchStateManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchStateManager")
            .field("key", &self.key)
            .field("state", &*self.state.borrow())
            .field("pending", &self.pending)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Applies the outcome of `operation` unless it has been cancelled.
///
/// The cancellation check, the cache write and the transition all happen
/// under the state channel's write lock, so a concurrent `bind` either sees
/// the result applied or the result is dropped.
fn complete<T>(
    state: &watch::Sender<FetchState<T>>,
    cache: &RequestCache,
    operation: &PendingOperation,
    outcome: Result<T, FetchError>,
) -> bool
where
    T: Clone + Send + Sync + 'static,
{
    state.send_if_modified(|current| {
        let key = operation.key();
        if operation.is_cancelled() {
            debug!(%key, "discarding stale completion");
            return false;
        }

        let event = match outcome {
            Ok(data) => {
                cache.put(key.clone(), data.clone());
                debug!(%key, "retrieval succeeded");
                FetchEvent::Succeeded(data)
            }
            Err(error) => {
                warn!(%key, %error, "retrieval failed");
                FetchEvent::Failed(error)
            }
        };
        *current = mem::replace(current, FetchState::Idle).reduce(event);
        true
    })
}
