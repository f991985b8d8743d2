use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error object reported by the remote store.
///
/// Matches the body PostgREST returns on failure; only `message` is
/// guaranteed to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendFailure {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl BackendFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// `{data, error}` pair produced by every backend call.
///
/// Exactly one side is meaningful: when `error` is set, `data` is discarded
/// by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackendResponse {
    pub data: Option<Value>,
    pub error: Option<BackendFailure>,
}

impl BackendResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(failure: BackendFailure) -> Self {
        Self {
            data: None,
            error: Some(failure),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::failure(BackendFailure::new(message))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
