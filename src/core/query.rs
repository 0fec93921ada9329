//! Query and mutation bindings over a shared cache.
//!
//! A [`Query`] is a cached read registered under a [`QueryKey`]. A [`Mutation`]
//! is a write that, once it succeeds, invalidates the keys it was declared
//! against so the next read goes back to the server. Invalidation is the only
//! consistency mechanism: there are no optimistic updates and no rollback.

use super::cache::{CacheStats, QueryCache};
use crate::error::ApiError;
use crate::storage::settings::Settings;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;

/// Name of a cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey(&'static str);

impl QueryKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[\"{}\"]", self.0)
    }
}

/// Owns the cache shared by every query and mutation bound to it.
///
/// Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct QueryClient {
    cache: QueryCache<QueryKey, Value>,
    fetch_locks: Arc<Mutex<HashMap<QueryKey, Arc<AsyncMutex<()>>>>>,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            cache: QueryCache::new(stale_time),
            fetch_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.stale_time)
    }

    /// Serve `key` from the cache, or run `query_fn` and cache its result.
    ///
    /// Fetches of the same key are serialized: callers that queued behind a
    /// running fetch receive its result instead of issuing their own request.
    /// Errors are returned as-is and never cached.
    pub async fn fetch_query<F, Fut>(&self, key: QueryKey, query_fn: F) -> Result<Value, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        if let Some(value) = self.cache.get(&key) {
            tracing::debug!(%key, "query cache hit");
            return Ok(value);
        }

        let waiting_since = Instant::now();
        let lock = self.fetch_lock(key);
        let _guard = lock.lock().await;

        if let Some(value) = self.cache.get_since(&key, waiting_since) {
            tracing::debug!(%key, "query served by concurrent fetch");
            return Ok(value);
        }

        let generation = self.cache.generation(&key);
        tracing::debug!(%key, "query cache miss, fetching");
        let value = query_fn().await?;

        if !self.cache.store_if_current(key, value.clone(), generation) {
            tracing::debug!(%key, "query invalidated while in flight, result not cached");
        }

        Ok(value)
    }

    /// Expire `key` so the next read refetches.
    pub fn invalidate_queries(&self, key: QueryKey) {
        tracing::debug!(%key, "invalidating query");
        self.cache.invalidate(&key);
    }

    /// Last cached value for `key`, stale or not
    pub fn get_query_data(&self, key: QueryKey) -> Option<Value> {
        self.cache.peek(&key)
    }

    pub fn set_query_data(&self, key: QueryKey, value: Value) {
        self.cache.set(key, value);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn fetch_lock(&self, key: QueryKey) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .fetch_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key).or_default())
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("stale_time", &self.cache.stale_time())
            .field("stats", &self.cache.stats())
            .finish()
    }
}

type QueryFn = Arc<dyn Fn() -> BoxFuture<'static, Result<Value, ApiError>> + Send + Sync>;

/// A read bound to a key and a client.
#[derive(Clone)]
pub struct Query {
    key: QueryKey,
    query_fn: QueryFn,
    client: QueryClient,
}

impl Query {
    pub fn new<F, Fut>(key: QueryKey, client: &QueryClient, query_fn: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        Self {
            key,
            query_fn: Arc::new(move || query_fn().boxed()),
            client: client.clone(),
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    pub async fn fetch(&self) -> Result<Value, ApiError> {
        self.client
            .fetch_query(self.key, || (self.query_fn)())
            .await
    }

    /// Invalidate, then fetch from the server.
    pub async fn refetch(&self) -> Result<Value, ApiError> {
        self.client.invalidate_queries(self.key);
        self.fetch().await
    }

    /// Cached data without triggering a fetch
    pub fn data(&self) -> Option<Value> {
        self.client.get_query_data(self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

type MutationFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, ApiError>> + Send + Sync>;

/// A write whose success invalidates a set of query keys.
pub struct Mutation<I, O = Value> {
    mutation_fn: MutationFn<I, O>,
    invalidates: Vec<QueryKey>,
    client: QueryClient,
    status: Arc<Mutex<MutationStatus>>,
}

impl<I, O> Clone for Mutation<I, O> {
    fn clone(&self) -> Self {
        Self {
            mutation_fn: Arc::clone(&self.mutation_fn),
            invalidates: self.invalidates.clone(),
            client: self.client.clone(),
            status: Arc::clone(&self.status),
        }
    }
}

impl<I, O> Mutation<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new<F, Fut>(client: &QueryClient, mutation_fn: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ApiError>> + Send + 'static,
    {
        Self {
            mutation_fn: Arc::new(move |input: I| mutation_fn(input).boxed()),
            invalidates: Vec::new(),
            client: client.clone(),
            status: Arc::new(Mutex::new(MutationStatus::Idle)),
        }
    }

    /// Invalidate `key` whenever this mutation succeeds.
    pub fn invalidates(mut self, key: QueryKey) -> Self {
        if !self.invalidates.contains(&key) {
            self.invalidates.push(key);
        }
        self
    }

    pub fn invalidated_keys(&self) -> &[QueryKey] {
        &self.invalidates
    }

    pub async fn mutate(&self, input: I) -> Result<O, ApiError> {
        self.set_status(MutationStatus::Pending);

        match (self.mutation_fn)(input).await {
            Ok(output) => {
                for key in &self.invalidates {
                    self.client.invalidate_queries(*key);
                }
                self.set_status(MutationStatus::Success);
                Ok(output)
            }
            Err(error) => {
                tracing::debug!(endpoint = error.endpoint(), "mutation failed, cache untouched");
                self.set_status(MutationStatus::Error);
                Err(error)
            }
        }
    }

    /// Status of the latest `mutate` call
    pub fn status(&self) -> MutationStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, status: MutationStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}
