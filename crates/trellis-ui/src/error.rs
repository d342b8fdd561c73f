//! Error types for widget operations.

use std::fmt;

/// Errors surfaced to callers of the widget framework.
///
/// Most misuse degrades gracefully (ignored re-entrant transitions, unresolvable
/// tool names, failed lookups). These variants cover the caller errors that
/// cannot be recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// A window set was asked for a name its factory does not know.
    UnknownWindow {
        /// The requested symbolic name.
        name: String,
    },

    /// A tool name was used that is not registered with the tool factory.
    UnknownTool {
        /// The requested tool name.
        name: String,
    },
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::UnknownWindow { name } => write!(f, "Unknown window: {}", name),
            UiError::UnknownTool { name } => write!(f, "Unknown tool: {}", name),
        }
    }
}

impl std::error::Error for UiError {}

/// Result type alias for widget operations.
pub type UiResult<T> = Result<T, UiError>;
