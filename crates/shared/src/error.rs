use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any failure reported by the remote note store: network, constraint,
/// not-found and misconfiguration all collapse into this one kind.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Client-side rejection of a draft before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required.")]
    TitleRequired,
    #[error("Content is required.")]
    ContentRequired,
}

impl ValidationError {
    /// Title is checked before content.
    pub fn check_draft(title: &str, content: &str) -> Result<(), Self> {
        if title.trim().is_empty() {
            return Err(Self::TitleRequired);
        }
        if content.trim().is_empty() {
            return Err(Self::ContentRequired);
        }
        Ok(())
    }
}
