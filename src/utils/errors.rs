use thiserror::Error;

use crate::api::ApiError;
use crate::forms::ValidationErrors;

/// Main error type for Blogdesk
#[derive(Error, Debug)]
pub enum BlogdeskError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Non-JSON response (status {status}): {body}")]
    NonJsonResponse { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}

impl BlogdeskError {
    /// The backend error, when the failure came from the backend
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Message suitable for inline display next to a form or view
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.message.clone(),
            other => other.to_string(),
        }
    }
}

/// Context attached to a failure that was already shown through
/// `notify_error`, so the top level only sets the exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("failure already reported")
    }
}

pub type Result<T> = std::result::Result<T, BlogdeskError>;
