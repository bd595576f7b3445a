//! Error types for google-sheets-mcp.
//!
//! # Security Note
//!
//! Error messages never include bearer tokens or credential material.
//! Authentication failures carry only the description produced by the
//! credential provider.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while executing a tool call.
///
/// Tool functions propagate these unchanged; the tool call handler is the
/// only place they are turned into text.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Ambient Google credentials could not be resolved or a token could
    /// not be fetched.
    #[error("authentication failed: {message}")]
    Auth {
        /// Description from the credential provider.
        message: String,
    },

    /// Tool arguments did not match the declared input shape.
    #[error("invalid arguments for tool '{tool}': {message}")]
    Validation {
        /// Tool being called.
        tool: String,
        /// What was wrong with the arguments.
        message: String,
    },

    /// No tool is registered under this name.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// Requested tool name.
        name: String,
    },

    /// The Sheets API rejected the request.
    ///
    /// The message is the remote service's own description, verbatim.
    #[error("{message}")]
    RemoteApi {
        /// HTTP status code.
        code: u16,
        /// Canonical status name from the error body (e.g. `PERMISSION_DENIED`).
        status: Option<String>,
        /// Error message from the remote service.
        message: String,
    },

    /// Network failure or a reply body that could not be decoded.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The configured API base URL cannot carry path segments.
    #[error("invalid Sheets API base URL: {url}")]
    InvalidBaseUrl {
        /// The offending URL.
        url: String,
    },

    /// A tool result could not be converted to JSON.
    #[error("failed to serialise tool result: {0}")]
    Serialisation(#[from] serde_json::Error),
}

impl ToolError {
    /// Creates a validation error for `tool`.
    #[must_use]
    pub fn validation(tool: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}
