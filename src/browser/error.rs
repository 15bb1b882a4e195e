//! Browser error types
//!
//! Every failure of a render after the request was accepted maps to one of
//! these variants.

use std::time::Duration;

use thiserror::Error;

/// Headless browser error type
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Browser process could not be started
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// No usable page handle
    #[error("Failed to create new page: {0}")]
    ContextCreation(String),

    /// Page could not be configured (viewport, lifecycle events)
    #[error("Browser protocol error: {0}")]
    Protocol(String),

    /// DNS, connection, TLS or invalid URL failures
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// PDF generation failed after navigation
    #[error("PDF export failed: {0}")]
    Export(String),

    /// A bounded step exceeded its ceiling
    #[error("{operation} timeout of {} ms exceeded", .timeout.as_millis())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// Browser teardown failed
    #[error("Failed to close browser: {0}")]
    Close(String),
}

impl BrowserError {
    /// Underlying message, if the fault carried one.
    pub fn cause(&self) -> Option<&str> {
        let message = match self {
            BrowserError::Launch(msg)
            | BrowserError::ContextCreation(msg)
            | BrowserError::Protocol(msg)
            | BrowserError::Navigation(msg)
            | BrowserError::Export(msg)
            | BrowserError::Close(msg) => msg.as_str(),
            BrowserError::Timeout { operation, .. } => *operation,
        };
        let message = message.trim();
        (!message.is_empty()).then_some(message)
    }
}

/// Result type alias for browser operations
pub type Result<T> = std::result::Result<T, BrowserError>;
