//! Shared request/response types used by API-facing crates.

use serde::{Deserialize, Serialize};

/// Body of a successful `GET /file/{path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContentsResponse {
    /// The path exactly as the client requested it.
    pub path: String,
    pub contents: String,
}

/// Body of `POST /terminal/execute`.
///
/// `command` is optional so that a missing field degrades to the empty command
/// instead of a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalRequest {
    #[serde(default)]
    pub command: Option<String>,
}

impl TerminalRequest {
    #[must_use]
    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalResponse {
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
