//! Per-request state
//!
//! A fresh [`RequestContext`] is inserted into every request's data by the HTTP
//! handler (see [`crate::api`]). It owns the request's list caches and is
//! dropped when the response has been produced, so nothing leaks between
//! requests.

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Result};
use parking_lot::Mutex;

use super::errors::ApiError;
use super::loader_cache::{LoaderCache, RequestFieldSet};
use super::types::UserPage;

/// State scoped to a single GraphQL request
#[derive(Default)]
pub struct RequestContext {
    user_lists: LoaderCache<Arc<UserPage>>,
    user_fields: Mutex<Option<RequestFieldSet>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batched cache for root `users` lists
    pub fn user_lists(&self) -> &LoaderCache<Arc<UserPage>> {
        &self.user_lists
    }

    /// Remember the field set of the most recent `users` resolution.
    ///
    /// Child resolvers read it to decide whether subscription edges were
    /// fetched with the list.
    pub fn record_user_fields(&self, fields: &RequestFieldSet) {
        *self.user_fields.lock() = Some(fields.clone());
    }

    pub fn requested_user_fields(&self) -> Option<RequestFieldSet> {
        self.user_fields.lock().clone()
    }

    /// Total list fetches started during this request
    pub fn fetches_issued(&self) -> usize {
        self.user_lists.fetches_issued()
    }
}

/// Extension trait for reading the request context from a resolver
pub trait RequestContextExt {
    fn request_context(&self) -> Result<&Arc<RequestContext>>;
}

impl<'a> RequestContextExt for Context<'a> {
    fn request_context(&self) -> Result<&Arc<RequestContext>> {
        self.data_opt::<Arc<RequestContext>>()
            .ok_or_else(|| ApiError::MissingRequestContext.extend())
    }
}
