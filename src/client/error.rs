//! Error taxonomy for recipe API calls.

use reqwest::StatusCode;

/// Everything that can go wrong between a user command and the backend.
///
/// The controller turns each variant into an alert at the UI boundary,
/// except [`ClientError::Cancelled`] which only happens after teardown.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Recipe not found.")]
    NotFound,
    #[error("Not logged in.")]
    NotAuthenticated,
    #[error("{action} failed with status {status}")]
    Status {
        action: &'static str,
        status: StatusCode,
    },
    #[error("Failed to connect to recipe server: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Invalid response from recipe server: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// True for non-success HTTP responses, as opposed to transport failures.
    pub fn is_status(&self) -> bool {
        matches!(self, ClientError::Status { .. })
    }
}
