//! The observable fetch lifecycle and its transition function.
//!
//! [`FetchState`] is what a presentation layer renders. Every transition
//! other than the reset to [`FetchState::Idle`] goes through
//! [`FetchState::reduce`], a pure function over the closed set of
//! [`FetchEvent`]s, so the lifecycle can be tested without any transport.

use crate::error::FetchError;

/// The state of the request currently bound to a manager.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    /// No key is bound.
    #[default]
    Idle,
    /// A retrieval for the bound key is in flight.
    Loading,
    /// The bound key resolved successfully.
    Fetched(T),
    /// The bound key resolved with an error.
    Failed(FetchError),
}

/// Events that drive [`FetchState::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent<T> {
    StartLoading,
    Succeeded(T),
    Failed(FetchError),
}

impl<T> FetchState<T> {
    /// Applies `event` and returns the next state.
    ///
    /// The next state depends only on the event: the lifecycle for a key
    /// never carries data or errors over from a previous key.
    #[must_use]
    pub fn reduce(self, event: FetchEvent<T>) -> Self {
        match event {
            FetchEvent::StartLoading => Self::Loading,
            FetchEvent::Succeeded(data) => Self::Fetched(data),
            FetchEvent::Failed(error) => Self::Failed(error),
        }
    }

    /// Returns the data if the request succeeded, otherwise `None`.
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Fetched(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the error if the request failed, otherwise `None`.
    pub const fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    fn not_found() -> FetchError {
        FetchError::Transport(TransportError::Status {
            status: 404,
            reason: "Not Found".to_string(),
        })
    }

    #[test]
    fn test_default_is_idle() {
        let state: FetchState<i32> = FetchState::default();
        assert!(state.is_idle());
    }

    #[test]
    fn test_reduce_happy_path() {
        let state = FetchState::Idle
            .reduce(FetchEvent::StartLoading)
            .reduce(FetchEvent::Succeeded(42));
        assert_eq!(state, FetchState::Fetched(42));
    }

    #[test]
    fn test_reduce_failure() {
        let state: FetchState<i32> = FetchState::Idle
            .reduce(FetchEvent::StartLoading)
            .reduce(FetchEvent::Failed(not_found()));
        assert_eq!(state, FetchState::Failed(not_found()));
    }

    #[test]
    fn test_reduce_drops_previous_data() {
        let state = FetchState::Fetched(1).reduce(FetchEvent::StartLoading);
        assert_eq!(state, FetchState::Loading);
        assert_eq!(state.data(), None);

        let state = FetchState::Failed(not_found()).reduce(FetchEvent::Succeeded(2));
        assert_eq!(state.error(), None);
        assert_eq!(state.data(), Some(&2));
    }

    #[test]
    fn test_state_predicates() {
        let idle: FetchState<i32> = FetchState::Idle;
        assert!(idle.is_idle());
        assert!(!idle.is_loading());
        assert!(!idle.is_fetched());
        assert!(!idle.is_failed());

        let loading: FetchState<i32> = FetchState::Loading;
        assert!(loading.is_loading());
        assert_eq!(loading.data(), None);

        let fetched = FetchState::Fetched(42);
        assert!(fetched.is_fetched());
        assert_eq!(fetched.data(), Some(&42));
        assert_eq!(fetched.error(), None);

        let failed: FetchState<i32> = FetchState::Failed(not_found());
        assert!(failed.is_failed());
        assert_eq!(failed.error(), Some(&not_found()));
    }
}
