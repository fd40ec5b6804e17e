#![forbid(unsafe_code)]

use sitenav_core::NavError;
use thiserror::Error;

/// Errors surfaced to JavaScript from `SiteNav` construction.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Nav(#[from] NavError),

    #[error("invalid mount options: {0}")]
    Options(#[from] serde_json::Error),

    /// A DOM call threw; the message is the stringified JS exception.
    #[error("dom error during {op}: {message}")]
    Js { op: &'static str, message: String },
}

impl WebError {
    pub fn js(op: &'static str, message: impl Into<String>) -> Self {
        Self::Js {
            op,
            message: message.into(),
        }
    }
}
