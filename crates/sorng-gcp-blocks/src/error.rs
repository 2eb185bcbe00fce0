//! Failure taxonomy for operation invocation.
//!
//! Every stage of an invocation fails with its own error type
//! ([`AuthError`], [`TemplateError`]) and the invoker folds them into a single
//! [`InvocationError`]. Nothing here is retried; callers that own invocation
//! frequency decide what to do with a failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credential resolution failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Neither a usable access token nor a usable service-account key.
    #[error("no credentials configured: {0}")]
    NoCredentialsConfigured(String),

    /// The service-account key could not be parsed or its signing material is unusable.
    #[error("malformed service account credentials: {0}")]
    MalformedCredentials(String),

    /// The token endpoint rejected the assertion or could not be reached.
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),
}

/// Path-template expansion failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing required path parameter '{0}'")]
    MissingParameter(String),

    #[error("path parameter '{0}' must be a string, number or boolean")]
    UnsupportedValue(String),

    #[error("malformed path template '{template}': {reason}")]
    Malformed { template: String, reason: String },
}

/// Coarse classification of an [`InvocationError`], suitable for serialising
/// to the hosting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    NoCredentialsConfigured,
    MalformedCredentials,
    TokenExchangeFailed,
    MissingParameter,
    RequestConstruction,
    RemoteRejected,
    Transport,
    DecodeError,
}

/// Terminal failure of one operation invocation.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("request construction failed: {0}")]
    RequestConstruction(#[from] TemplateError),

    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status. `status_text` is the
    /// canonical reason phrase for `status`, not the phrase the server sent;
    /// codes without one read `Unknown`.
    #[error("HTTP {status} {status_text}{}", detail(.message))]
    RemoteRejected {
        status: u16,
        status_text: String,
        /// Google `error.message`, when the body happened to carry one.
        message: Option<String>,
    },

    #[error("failed to decode JSON response: {0}")]
    Decode(String),
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl InvocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(AuthError::NoCredentialsConfigured(_)) => ErrorKind::NoCredentialsConfigured,
            Self::Auth(AuthError::MalformedCredentials(_)) => ErrorKind::MalformedCredentials,
            Self::Auth(AuthError::TokenExchangeFailed(_)) => ErrorKind::TokenExchangeFailed,
            Self::RequestConstruction(TemplateError::MissingParameter(_)) => {
                ErrorKind::MissingParameter
            }
            Self::RequestConstruction(_) => ErrorKind::RequestConstruction,
            Self::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::DecodeError,
        }
    }

    /// HTTP status of a remote rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn transport(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }

    /// Build a rejection from a non-2xx response body. The body is inspected
    /// for the Google `{ "error": { "message": ... } }` envelope but never
    /// required to parse.
    pub(crate) fn rejected(status: reqwest::StatusCode, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ApiErrorInner {
            message: Option<String>,
        }
        #[derive(Deserialize)]
        struct ApiErrorWrapper {
            error: Option<ApiErrorInner>,
        }

        let message = serde_json::from_str::<ApiErrorWrapper>(body)
            .ok()
            .and_then(|w| w.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty());

        Self::RemoteRejected {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        }
    }
}

/// Wire form of an [`InvocationError`] handed to the hosting runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

impl From<&InvocationError> for ErrorReport {
    fn from(e: &InvocationError) -> Self {
        let status_text = match e {
            InvocationError::RemoteRejected { status_text, .. } => Some(status_text.clone()),
            _ => None,
        };
        Self {
            kind: e.kind(),
            message: e.to_string(),
            status: e.status(),
            status_text,
        }
    }
}

/// Convert to a JSON string for command-style returns.
impl From<InvocationError> for String {
    fn from(e: InvocationError) -> String {
        let report = ErrorReport::from(&e);
        serde_json::to_string(&report).unwrap_or(report.message)
    }
}

/// Convenience alias used throughout the crate.
pub type InvocationResult<T = serde_json::Value> = Result<T, InvocationError>;
