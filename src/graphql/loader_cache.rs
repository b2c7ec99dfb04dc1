//! Per-request batched loader cache for list fields
//!
//! A list field such as `users` can be reached several times while one request
//! executes (fragments, aliases, sibling selections). Each resolution computes a
//! [`RequestFieldSet`] from its sub-selection and asks the cache for a fetch
//! handle. The first caller for a given `(SelectionKey, field set)` installs a
//! shared future; everyone after that awaits the same future, so the data layer
//! sees at most one fetch per distinct key for the life of the request.
//!
//! Failed fetches are not evicted: every caller of the same key observes the
//! same error.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_graphql::context::SelectionField;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;

/// Outcome of a shared fetch. Errors are reference counted so every waiter gets one.
pub type FetchResult<T> = Result<T, Arc<anyhow::Error>>;

/// A cloneable handle to an in-flight or completed fetch
pub type FetchHandle<T> = Shared<BoxFuture<'static, FetchResult<T>>>;

// ============================================================================
// Field sets
// ============================================================================

/// Distinct field names requested on one list selection, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFieldSet {
    names: Vec<String>,
}

impl RequestFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field set, dropping duplicates and keeping first occurrence order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name);
        }
        set
    }

    /// Collect the direct sub-selections of a field.
    ///
    /// Fragment spreads and inline fragments are flattened by async-graphql;
    /// aliases resolve to the underlying field name. Introspection fields
    /// (`__typename`) are not data and are skipped.
    pub fn from_selection(field: SelectionField<'_>) -> Self {
        Self::from_names(
            field
                .selection_set()
                .map(|f| f.name())
                .filter(|name| !name.starts_with("__")),
        )
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Cache key for this field set.
    ///
    /// Names are sorted before joining so that `{ id name }` and `{ name id }`
    /// share one fetch.
    pub fn cache_key(&self) -> String {
        let mut sorted: Vec<&str> = self.names.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted.join(",")
    }
}

// ============================================================================
// Selection partition
// ============================================================================

/// Opaque token partitioning the cache by list field.
///
/// Resolvers derive it from the schema name of the list field being
/// resolved, so aliased occurrences of the same list share entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey(String);

impl SelectionKey {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Partition for the field currently being resolved
    pub fn for_field(field: SelectionField<'_>) -> Self {
        Self(field.name().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Map from `(SelectionKey, cache key)` to a shared fetch handle.
///
/// Owned by a single request's [`RequestContext`](super::context::RequestContext)
/// and dropped with it.
pub struct LoaderCache<T> {
    entries: Mutex<HashMap<(SelectionKey, String), FetchHandle<T>>>,
    fetches: AtomicUsize,
}

impl<T> Default for LoaderCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }
}

impl<T> LoaderCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for this selection and field set, installing one
    /// built by `fetch` if none exists yet.
    ///
    /// `fetch` is only invoked by the first caller for a key. The lock is held
    /// while the future is constructed but never across an await.
    pub fn handle<F, Fut>(
        &self,
        selection: &SelectionKey,
        fields: &RequestFieldSet,
        fetch: F,
    ) -> FetchHandle<T>
    where
        F: FnOnce(&RequestFieldSet) -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let cache_key = fields.cache_key();
        let key = (selection.clone(), cache_key.clone());
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.get(&key) {
            tracing::debug!(
                selection = selection.as_str(),
                fields = %cache_key,
                "Joining existing batched fetch"
            );
            return existing.clone();
        }

        let fetch_number = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            selection = selection.as_str(),
            fields = %cache_key,
            fetch_number,
            "Installing batched fetch"
        );

        let future = fetch(fields);
        let handle = async move { future.await.map_err(Arc::new) }
            .boxed()
            .shared();
        entries.insert(key, handle.clone());
        handle
    }

    /// Resolve the shared fetch for this selection and field set
    pub async fn load<F, Fut>(
        &self,
        selection: &SelectionKey,
        fields: &RequestFieldSet,
        fetch: F,
    ) -> FetchResult<T>
    where
        F: FnOnce(&RequestFieldSet) -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.handle(selection, fields, fetch).await
    }

    /// Number of underlying fetches this cache has started
    pub fn fetches_issued(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of cached handles
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn counting_fetch(
        calls: Arc<AtomicUsize>,
    ) -> impl FnOnce(&RequestFieldSet) -> BoxFuture<'static, anyhow::Result<Vec<String>>> {
        move |fields: &RequestFieldSet| {
            let names = fields.names().to_vec();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(names)
            }
            .boxed()
        }
    }

    #[test]
    fn test_field_set_dedups_in_order() {
        let set = RequestFieldSet::from_names(["name", "id", "name", "posts"]);
        assert_eq!(set.names(), &["name", "id", "posts"]);
        assert!(set.contains("posts"));
        assert!(!set.contains("profile"));
    }

    #[test]
    fn test_cache_key_is_order_insensitive() {
        let a = RequestFieldSet::from_names(["id", "name"]);
        let b = RequestFieldSet::from_names(["name", "id"]);
        assert_eq!(a.cache_key(), "id,name");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(RequestFieldSet::new().cache_key(), "");
    }

    #[tokio::test]
    async fn test_same_field_set_fetches_once() {
        let cache = LoaderCache::<Vec<String>>::new();
        let calls = counter();
        let selection = SelectionKey::new("users");
        let fields = RequestFieldSet::from_names(["id", "subscribedToUser"]);

        let first = cache
            .load(&selection, &fields, counting_fetch(calls.clone()))
            .await
            .unwrap();
        let second = cache
            .load(&selection, &fields, counting_fetch(calls.clone()))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.fetches_issued(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_different_field_sets_fetch_independently() {
        let cache = LoaderCache::<Vec<String>>::new();
        let calls = counter();
        let selection = SelectionKey::new("users");

        let a = RequestFieldSet::from_names(["id"]);
        let b = RequestFieldSet::from_names(["id", "userSubscribedTo"]);

        let first = cache.load(&selection, &a, counting_fetch(calls.clone())).await.unwrap();
        let second = cache.load(&selection, &b, counting_fetch(calls.clone())).await.unwrap();

        assert_eq!(first, vec!["id".to_string()]);
        assert_eq!(second, vec!["id".to_string(), "userSubscribedTo".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.fetches_issued(), 2);
    }

    #[tokio::test]
    async fn test_selection_keys_partition_the_cache() {
        let cache = LoaderCache::<Vec<String>>::new();
        let calls = counter();
        let fields = RequestFieldSet::from_names(["id"]);

        cache
            .load(&SelectionKey::new("users"), &fields, counting_fetch(calls.clone()))
            .await
            .unwrap();
        cache
            .load(&SelectionKey::new("authors"), &fields, counting_fetch(calls.clone()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_in_flight_fetch() {
        let cache = LoaderCache::<Vec<String>>::new();
        let calls = counter();
        let selection = SelectionKey::new("users");
        let fields = RequestFieldSet::from_names(["id", "name"]);
        let reordered = RequestFieldSet::from_names(["name", "id"]);

        let (a, b, c) = tokio::join!(
            cache.load(&selection, &fields, counting_fetch(calls.clone())),
            cache.load(&selection, &fields, counting_fetch(calls.clone())),
            cache.load(&selection, &reordered, counting_fetch(calls.clone())),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), b.unwrap());
        // The first caller's field order wins for the shared payload
        assert_eq!(c.unwrap(), vec!["id".to_string(), "name".to_string()]);
    }

    #[tokio::test]
    async fn test_failures_propagate_and_stay_cached() {
        let cache = LoaderCache::<Vec<String>>::new();
        let calls = counter();
        let selection = SelectionKey::new("users");
        let fields = RequestFieldSet::from_names(["id"]);

        let failing = |calls: Arc<AtomicUsize>| {
            move |_: &RequestFieldSet| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<Vec<String>, _>(anyhow::anyhow!("database is locked"))
            }
        };

        let (a, b) = tokio::join!(
            cache.load(&selection, &fields, failing(calls.clone())),
            cache.load(&selection, &fields, failing(calls.clone())),
        );
        let later = cache.load(&selection, &fields, failing(calls.clone())).await;

        for result in [a, b, later] {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "database is locked");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_is_lazy_until_awaited() {
        let cache = LoaderCache::<Vec<String>>::new();
        let calls = counter();
        let selection = SelectionKey::new("users");
        let fields = RequestFieldSet::from_names(["id"]);

        let handle = cache.handle(&selection, &fields, counting_fetch(calls.clone()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.fetches_issued(), 1);

        handle.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
