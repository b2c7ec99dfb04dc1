//! API error taxonomy and conversion into GraphQL field errors
//!
//! Every error is attached to the field that raised it; sibling fields in the
//! same request still resolve. The `code` extension tells clients which kind
//! of failure they are looking at.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use thiserror::Error;

use super::scalars::ScalarError;

/// Errors raised while resolving a field
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// A value crossing the API boundary failed scalar validation
    #[error(transparent)]
    InvalidScalar(#[from] ScalarError),

    /// The persistence layer failed; passed through unchanged
    #[error("{0}")]
    Upstream(Arc<anyhow::Error>),

    /// Per-request state was not installed on the request
    #[error("Request context is missing")]
    MissingRequestContext,
}

impl ApiError {
    /// Machine-readable error code exposed in `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidScalar(_) => "BAD_USER_INPUT",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::MissingRequestContext => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn into_graphql(self) -> async_graphql::Error {
        self.extend()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Upstream(Arc::new(err))
    }
}

impl From<Arc<anyhow::Error>> for ApiError {
    fn from(err: Arc<anyhow::Error>) -> Self {
        ApiError::Upstream(err)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        if let ApiError::Upstream(source) = self {
            tracing::warn!(error = %source, "Upstream data operation failed");
        }
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", code);
            if let ApiError::InvalidScalar(scalar) = self {
                e.set("scalar", scalar.scalar());
            }
        })
    }
}

/// Convert persistence results into GraphQL results tagged as upstream failures
pub(crate) trait UpstreamExt<T> {
    fn upstream(self) -> async_graphql::Result<T>;
}

impl<T> UpstreamExt<T> for anyhow::Result<T> {
    fn upstream(self) -> async_graphql::Result<T> {
        self.map_err(|e| ApiError::from(e).into_graphql())
    }
}

impl<T> UpstreamExt<T> for Result<T, Arc<anyhow::Error>> {
    fn upstream(self) -> async_graphql::Result<T> {
        self.map_err(|e| ApiError::from(e).into_graphql())
    }
}
