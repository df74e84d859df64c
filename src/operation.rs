use std::fmt;
use std::future::IntoFuture;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::key::RequestKey;

/// One in-flight retrieval: the key it was issued for and its cancellation
/// token.
///
/// Clones share the token. The manager keeps one clone and the [`Retrieval`]
/// carries another; cancelling either marks the completion as stale.
#[derive(Debug, Clone)]
pub struct PendingOperation {
    key: RequestKey,
    token: CancellationToken,
}

impl PendingOperation {
    pub(crate) fn new(key: RequestKey) -> Self {
        Self {
            key,
            token: CancellationToken::new(),
        }
    }

    pub const fn key(&self) -> &RequestKey {
        &self.key
    }

    /// Marks the operation as superseded. Transport I/O keeps running; only
    /// its result is discarded.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// The deferred work of a [`bind`](crate::manager::FetchStateManager::bind).
///
/// A retrieval does nothing until it is driven: `.await` it from the host's
/// event loop, or [`spawn`](Self::spawn) it onto the Tokio runtime. Cache
/// hits and unbinds produce an empty retrieval that completes immediately.
///
/// # Example
///
/// ```rust,ignore
/// // await in place
/// manager.bind(Some(key)).await;
///
/// // or let the runtime drive it
/// let handle = manager.bind(Some(key)).spawn();
/// ```
#[must_use = "a retrieval does nothing unless it is awaited or spawned"]
pub struct Retrieval {
    future: Option<BoxFuture<'static, ()>>,
}

impl Retrieval {
    /// A retrieval with no work to do.
    pub(crate) fn none() -> Self {
        Self { future: None }
    }

    pub(crate) fn new(future: impl Future<Output = ()> + Send + 'static) -> Self {
        Self {
            future: Some(future.boxed()),
        }
    }

    /// Returns `true` if the bind was resolved without starting a retrieval.
    pub const fn is_none(&self) -> bool {
        self.future.is_none()
    }

    /// Spawns the retrieval onto the current Tokio runtime.
    ///
    /// Returns `None` for an empty retrieval.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(self) -> Option<JoinHandle<()>> {
        self.future.map(tokio::spawn)
    }
}

impl IntoFuture for Retrieval {
    type Output = ();
    type IntoFuture = BoxFuture<'static, ()>;

    fn into_future(self) -> Self::IntoFuture {
        self.future.unwrap_or_else(|| future::ready(()).boxed())
    }
}

impl fmt::Debug for Retrieval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrieval")
            .field("is_none", &self.is_none())
            .finish()
    }
}
