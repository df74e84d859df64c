use std::any::Any;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::key::RequestKey;

/// Process-wide store of successful results, keyed by [`RequestKey`].
///
/// Entries are written only after a retrieval succeeds and are never evicted.
/// Cloning is cheap and clones share the same storage, so one cache is
/// created at startup and handed to every manager that should share results.
///
/// Values are stored type-erased. A lookup with a type other than the one the
/// entry was written with behaves as a miss.
///
/// # Example
///
/// ```
/// use fetchstate::cache::RequestCache;
/// use fetchstate::key::RequestKey;
///
/// let cache = RequestCache::new();
/// let key = RequestKey::new("https://api.example.com/posts/1");
///
/// assert_eq!(cache.get::<String>(&key), None);
/// cache.put(key.clone(), "first post".to_string());
/// assert_eq!(cache.get::<String>(&key).as_deref(), Some("first post"));
/// ```
#[derive(Clone, Default)]
pub struct RequestCache {
    entries: Arc<DashMap<RequestKey, Box<dyn Any + Send + Sync>>>,
}

impl RequestCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the result stored for `key`.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &RequestKey) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|entry| entry.downcast_ref::<T>().cloned())
    }

    /// Stores `value` for `key`, replacing any previous entry.
    pub fn put<T: Send + Sync + 'static>(&self, key: RequestKey, value: T) {
        tracing::trace!(%key, "caching result");
        self.entries.insert(key, Box::new(value));
    }

    /// Returns `true` if any result is stored for `key`.
    pub fn contains(&self, key: &RequestKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestCache")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_is_empty() {
        let cache = RequestCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get::<i32>(&RequestKey::new("key1")), None);
    }

    #[test]
    fn test_put_then_get() {
        let cache = RequestCache::new();
        let key = RequestKey::new("key1");

        cache.put(key.clone(), vec![1, 2, 3]);

        assert!(cache.contains(&key));
        assert_eq!(cache.get::<Vec<i32>>(&key), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = RequestCache::new();
        let key = RequestKey::new("key1");

        cache.put(key.clone(), 1);
        cache.put(key.clone(), 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<i32>(&key), Some(2));
    }

    #[test]
    fn test_wrong_type_is_a_miss() {
        let cache = RequestCache::new();
        let key = RequestKey::new("key1");

        cache.put(key.clone(), 42_i32);

        assert!(cache.contains(&key));
        assert_eq!(cache.get::<String>(&key), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = RequestCache::new();
        let other = cache.clone();

        other.put(RequestKey::new("shared"), "value".to_string());

        assert_eq!(
            cache.get::<String>(&RequestKey::new("shared")).as_deref(),
            Some("value")
        );
    }

    #[test]
    fn test_debug_shows_len() {
        let cache = RequestCache::new();
        cache.put(RequestKey::new("a"), 1);
        assert_eq!(format!("{cache:?}"), "RequestCache { len: 1 }");
    }
}
