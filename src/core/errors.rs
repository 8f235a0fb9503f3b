//! Classification of failed backend exchanges.
//!
//! Every request attempt that does not produce a usable reply is mapped to
//! exactly one [`ErrorKind`]. The kind decides the user-facing message and
//! whether the backend should be reported as disconnected.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

use crate::core::constants::{CHAT_ENDPOINT, TASK_LIST_ENDPOINT};

/// The backend route a request was aimed at. Some messages differ per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chat,
    TaskList,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Chat => CHAT_ENDPOINT,
            Endpoint::TaskList => TASK_LIST_ENDPOINT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request did not settle within the request budget.
    Timeout,
    /// The connection was refused or the host could not be reached.
    Unreachable,
    /// HTTP 404.
    EndpointNotFound,
    /// HTTP 500.
    ServerError,
    /// Any other status besides 200.
    UnexpectedStatus(u16),
    /// HTTP 200 with a body that is not the JSON we expect.
    MalformedResponse,
    /// Anything else that went wrong on this side of the wire.
    InternalClientError,
    /// Another turn for the same session is still waiting on the backend.
    SessionBusy,
}

impl ErrorKind {
    /// Kinds that mean the backend itself is missing, as opposed to a backend
    /// that answered badly.
    pub fn marks_disconnected(self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::Unreachable | ErrorKind::EndpointNotFound
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unreachable => "unreachable",
            ErrorKind::EndpointNotFound => "endpoint-not-found",
            ErrorKind::ServerError => "server-error",
            ErrorKind::UnexpectedStatus(_) => "unexpected-status",
            ErrorKind::MalformedResponse => "malformed-response",
            ErrorKind::InternalClientError => "internal-client-error",
            ErrorKind::SessionBusy => "session-busy",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnexpectedStatus(code) => write!(f, "{} ({code})", self.as_str()),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// A classified failure together with the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    kind: ErrorKind,
    message: String,
}

impl BackendError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for BackendError {}

/// Maps a transport error to its kind. Timeouts win over connection errors
/// because a connect timeout reports both.
///
/// Send failures (`is_request`) and a response body cut off mid-read
/// (`is_body`, or `is_decode` since no content decoders are enabled) all mean
/// the backend stopped talking to us, so they count as unreachable.
pub fn classify_transport(err: &reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Timeout
    } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
        ErrorKind::Unreachable
    } else {
        ErrorKind::InternalClientError
    }
}

/// Maps a response status to its kind; `None` means the status is 200.
pub fn classify_status(status: StatusCode) -> Option<ErrorKind> {
    match status {
        StatusCode::OK => None,
        StatusCode::NOT_FOUND => Some(ErrorKind::EndpointNotFound),
        StatusCode::INTERNAL_SERVER_ERROR => Some(ErrorKind::ServerError),
        other => Some(ErrorKind::UnexpectedStatus(other.as_u16())),
    }
}

/// Builds [`BackendError`]s for one request, filling the message templates
/// with the endpoint, backend address, and timeout budget involved.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier<'a> {
    endpoint: Endpoint,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a> ErrorClassifier<'a> {
    pub fn new(endpoint: Endpoint, base_url: &'a str, timeout: Duration) -> Self {
        Self {
            endpoint,
            base_url,
            timeout,
        }
    }

    pub fn transport(&self, err: &reqwest::Error) -> BackendError {
        let kind = classify_transport(err);
        let detail = err.to_string();
        self.build(kind, Some(&detail))
    }

    pub fn status(&self, status: StatusCode) -> Option<BackendError> {
        classify_status(status).map(|kind| self.build(kind, None))
    }

    pub fn malformed(&self, detail: impl fmt::Display) -> BackendError {
        self.build(ErrorKind::MalformedResponse, Some(&detail.to_string()))
    }

    pub fn internal(&self, detail: impl fmt::Display) -> BackendError {
        self.build(ErrorKind::InternalClientError, Some(&detail.to_string()))
    }

    pub fn session_busy(&self) -> BackendError {
        self.build(ErrorKind::SessionBusy, None)
    }

    fn build(&self, kind: ErrorKind, detail: Option<&str>) -> BackendError {
        BackendError::new(kind, self.message_for(kind, detail))
    }

    fn message_for(&self, kind: ErrorKind, detail: Option<&str>) -> String {
        let detail = detail.unwrap_or_default();
        match (kind, self.endpoint) {
            (ErrorKind::Timeout, Endpoint::Chat) => format!(
                "⏱️ Request timed out after {}. The backend may be overloaded.",
                format_budget(self.timeout)
            ),
            (ErrorKind::Timeout, Endpoint::TaskList) => {
                format!("⏱️ Request timed out after {}.", format_budget(self.timeout))
            }
            (ErrorKind::Unreachable, _) => format!(
                "❌ Cannot connect to backend at {}. Make sure the backend is running.",
                self.base_url
            ),
            (ErrorKind::EndpointNotFound, Endpoint::Chat) => {
                "❌ Backend endpoint not found. Is the backend running correctly?".to_string()
            }
            (ErrorKind::EndpointNotFound, Endpoint::TaskList) => {
                "❌ Tasks endpoint not found. Is the backend running correctly?".to_string()
            }
            (ErrorKind::ServerError, Endpoint::Chat) => {
                "❌ Backend server error. Please check the backend logs.".to_string()
            }
            (ErrorKind::ServerError, Endpoint::TaskList) => {
                "❌ Backend server error while fetching tasks. Check backend logs.".to_string()
            }
            (ErrorKind::UnexpectedStatus(code), _) => {
                format!("❌ Unexpected error: HTTP {code}")
            }
            (ErrorKind::MalformedResponse, Endpoint::Chat) => {
                format!("❌ Error parsing response: {detail}")
            }
            (ErrorKind::MalformedResponse, Endpoint::TaskList) => {
                format!("❌ Error parsing tasks data: {detail}")
            }
            (ErrorKind::InternalClientError, _) => format!("❌ Unexpected error: {detail}"),
            (ErrorKind::SessionBusy, _) => {
                "⏳ Still waiting on the previous message for this session. Please wait for its reply."
                    .to_string()
            }
        }
    }
}

fn format_budget(budget: Duration) -> String {
    if budget.subsec_nanos() == 0 {
        format!("{} seconds", budget.as_secs())
    } else {
        format!("{} ms", budget.as_millis())
    }
}
