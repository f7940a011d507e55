//! Failure taxonomy for prediction requests and form submission.

use reqwest::StatusCode;
use shared::domain::FormField;
use thiserror::Error;

pub const BACKEND_UNAVAILABLE_NOTICE: &str =
    "Backend not connected! Start the prediction service and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Service,
    MalformedResponse,
    InvalidInput,
}

/// A form value that could not be converted for transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} ({}): '{value}' is not {expected}", .field.label(), .field.key())]
pub struct InvalidInput {
    pub field: FormField,
    pub value: String,
    pub expected: String,
}

impl InvalidInput {
    pub fn new(field: FormField, value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            expected: expected.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("prediction service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service returned {status}{}", detail_suffix(.detail))]
    Service {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),
    #[error("invalid passenger input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Service { .. } => FailureKind::Service,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::InvalidInput(_) => FailureKind::InvalidInput,
        }
    }

    /// Whether the failure says something about reachability of the service.
    pub fn affects_connectivity(&self) -> bool {
        self.kind() != FailureKind::InvalidInput
    }

    /// Text shown to the user. Every I/O failure maps to the same notice.
    pub fn user_notice(&self) -> String {
        match self {
            Self::InvalidInput(invalid) => format!("Please fix the form: {invalid}"),
            _ => BACKEND_UNAVAILABLE_NOTICE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::MalformedResponse(value.to_string())
        } else if let Some(status) = value.status() {
            Self::Service {
                status,
                detail: None,
            }
        } else {
            Self::Transport(value)
        }
    }
}
