//! Backend-to-UI events and error modeling for the desktop GUI.

use client_core::GatewayReply;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Reply(GatewayReply),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
}

/// Failure of the shell itself, as opposed to a gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line form for the status bar.
    pub fn summary(&self) -> String {
        let label = match self.context {
            UiErrorContext::BackendStartup => "Backend worker startup failure",
        };
        format!("{label}: {}", self.message)
    }
}
