#![forbid(unsafe_code)]

//! Error type shared by the controller and its hosts.

use thiserror::Error;

/// Errors raised while configuring or driving a [`NavController`](crate::NavController).
///
/// A link whose jump target does not exist is deliberately *not* an error:
/// the controller logs a warning and does nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// A required element could not be found during setup.
    #[error("required element not found: {0}")]
    MissingElement(&'static str),

    /// The host-supplied configuration could not be parsed.
    #[error("invalid navigation config: {0}")]
    InvalidConfig(String),

    /// A handler was invoked for a link index the controller does not know.
    #[error("no navigation link at index {0}")]
    UnknownLink(usize),

    /// The controller has already been torn down.
    #[error("navigation controller has been torn down")]
    TornDown,
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
