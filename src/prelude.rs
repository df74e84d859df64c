//! Prelude module for convenient imports.
//!
//! ```
//! use fetchstate::prelude::*;
//! ```
//!
//! # What's included
//!
//! - [`FetchStateManager`] - Binds keys and tracks their lifecycle
//! - [`FetchState`] and [`FetchEvent`] - The state machine
//! - [`RequestCache`] - Shared cache of successful results
//! - [`RequestKey`] and [`RequestOptions`] - Request identity
//! - [`Transport`] and [`HttpTransport`] - Request execution
//! - [`FetchError`] - Failure payload of `FetchState::Failed`

pub use crate::cache::RequestCache;
pub use crate::config::HttpConfig;
pub use crate::error::{DecodeError, FetchError, TransportError};
pub use crate::key::{RequestKey, RequestOptions};
pub use crate::manager::FetchStateManager;
pub use crate::operation::Retrieval;
pub use crate::state::{FetchEvent, FetchState};
pub use crate::transport::Transport;
pub use crate::transport::http::HttpTransport;
