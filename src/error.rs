//! Error types for the navigator runtime.
//!
//! Fetch failures never escape the event loop: the controller turns them
//! into display state. They are `Clone` so results can travel inside events.

use thiserror::Error;

/// Failure of a request to the rendering server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server has no data for the current selection (HTTP 404).
    #[error("No data for this selection: {message}")]
    NotFound { message: String },

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, timeout or other transport failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// What the display surface shows in place of a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("No data for this selection. {0}")]
    NoData(String),

    #[error("Error: {0}")]
    Failed(String),
}

impl From<&FetchError> for DisplayError {
    fn from(e: &FetchError) -> Self {
        match e {
            FetchError::NotFound { message } => DisplayError::NoData(message.clone()),
            other => DisplayError::Failed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_becomes_no_data() {
        let err = FetchError::NotFound {
            message: "No data found for the selected filters.".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            DisplayError::from(&err),
            DisplayError::NoData("No data found for the selected filters.".into())
        );
    }

    #[test]
    fn other_failures_become_failed() {
        let err = FetchError::Status {
            status: 500,
            body: "boom".into(),
        };
        let display = DisplayError::from(&err);
        assert!(matches!(display, DisplayError::Failed(ref m) if m.contains("500")));
    }
}
