//! # fetchstate - asynchronous data-fetch state management
//!
//! fetchstate turns "fetch this URL" into an explicit, observable lifecycle.
//! Give a manager a request key and it performs the retrieval, tracks
//! loading/success/error as state, caches successful results by request
//! identity, and ignores responses that arrive after the request was
//! superseded or the consumer went away.
//!
//! ## Architecture
//!
//! 1. **Key**: a URL plus request options; equal keys mean equivalent results
//! 2. **Cache**: process-wide store of successful results, shared by managers
//! 3. **State**: `Idle`, `Loading`, `Fetched(data)` or `Failed(error)`
//! 4. **Manager**: binds one key at a time and drives the state machine
//! 5. **Transport**: performs the actual request (HTTP, or a mock in tests)
//!
//! ## Core Components
//!
//! - [`FetchStateManager`](manager::FetchStateManager): binds keys and owns the lifecycle
//! - [`RequestCache`](cache::RequestCache): shared cache of successful results
//! - [`FetchState`](state::FetchState): the observable state
//! - [`Retrieval`](operation::Retrieval): deferred work returned by `bind`
//! - [`Transport`](transport::Transport): pluggable request execution
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fetchstate::prelude::*;
//! use fetchstate::transport::mock::MockTransport;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mock = MockTransport::new();
//! let key = RequestKey::new("https://api/posts/1");
//! mock.respond_json(key.clone(), &serde_json::json!({ "id": 1, "title": "A" }));
//!
//! let cache = RequestCache::new();
//! let mut manager: FetchStateManager<serde_json::Value> =
//!     FetchStateManager::new(cache.clone(), Arc::new(mock.clone()));
//!
//! manager.bind(Some(key.clone())).await;
//! assert!(manager.current_state().is_fetched());
//! assert!(cache.contains(&key));
//!
//! // a second bind is answered from the cache
//! let retrieval = manager.bind(Some(key.clone()));
//! assert!(retrieval.is_none());
//! assert_eq!(mock.call_count(&key), 1);
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod manager;
pub mod operation;
pub mod prelude;
pub mod state;
pub mod transport;
