use std::future::Future;

use crate::error::{AppError, AppResult};

/// Pending / success / error view of a query or mutation, for callers that
/// render the outcome rather than propagate it.
#[derive(Debug, Default)]
pub enum QueryState<T> {
    #[default]
    Pending,
    Success(T),
    Error(AppError),
}

impl<T> QueryState<T> {
    /// Await `call` and capture its outcome.
    pub async fn track<F>(call: F) -> Self
    where
        F: Future<Output = AppResult<T>>,
    {
        call.await.into()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            QueryState::Error(e) => Some(e),
            _ => None,
        }
    }

    /// `None` while pending.
    pub fn into_result(self) -> Option<AppResult<T>> {
        match self {
            QueryState::Pending => None,
            QueryState::Success(data) => Some(Ok(data)),
            QueryState::Error(e) => Some(Err(e)),
        }
    }
}

impl<T> From<AppResult<T>> for QueryState<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => QueryState::Success(data),
            Err(e) => QueryState::Error(e),
        }
    }
}
