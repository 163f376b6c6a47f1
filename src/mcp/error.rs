//! MCP-specific error types and mapping to JSON-RPC error codes.

use crate::error::DiscuteError;
use rmcp::model::ErrorCode;
use rmcp::ErrorData as RmcpError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Custom MCP error codes (in the -32000 to -32099 range for server errors)
pub mod error_codes {
    pub const PROGRAM_NOT_FOUND: i32 = -32001;
    pub const LEVEL_NOT_FOUND: i32 = -32002;
    pub const VALIDATION_FAILED: i32 = -32003;
    pub const MISSING_VARIABLE: i32 = -32004;
    pub const STORAGE_ERROR: i32 = -32010;
    pub const INTERNAL_ERROR: i32 = -32011;
}

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum McpError {
    #[error("Prompt program not found: {name}")]
    ProgramNotFound { name: String },

    #[error("CEFR level not found: {level}")]
    LevelNotFound { level: String },

    #[error("Missing variable '{key}' in prompt '{program}'")]
    MissingVariable { key: String, program: String },

    #[error("Validation failed for field '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl McpError {
    /// Get the JSON-RPC error code for this error type.
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::ProgramNotFound { .. } => error_codes::PROGRAM_NOT_FOUND,
            McpError::LevelNotFound { .. } => error_codes::LEVEL_NOT_FOUND,
            McpError::MissingVariable { .. } => error_codes::MISSING_VARIABLE,
            McpError::ValidationFailed { .. } => error_codes::VALIDATION_FAILED,
            McpError::StorageError { .. } => error_codes::STORAGE_ERROR,
            McpError::InternalError { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Get the error type name for the data payload.
    pub fn error_type(&self) -> &'static str {
        match self {
            McpError::ProgramNotFound { .. } => "ProgramNotFound",
            McpError::LevelNotFound { .. } => "LevelNotFound",
            McpError::MissingVariable { .. } => "MissingVariable",
            McpError::ValidationFailed { .. } => "ValidationFailed",
            McpError::StorageError { .. } => "StorageError",
            McpError::InternalError { .. } => "InternalError",
        }
    }

    /// Convert to rmcp ErrorData for JSON-RPC response.
    pub fn to_rmcp_error(&self) -> RmcpError {
        RmcpError {
            code: ErrorCode(self.error_code()),
            message: self.to_string().into(),
            data: Some(json!({
                "error_type": self.error_type(),
                "details": self.clone()
            })),
        }
    }
}

impl From<McpError> for RmcpError {
    fn from(err: McpError) -> Self {
        err.to_rmcp_error()
    }
}

impl From<DiscuteError> for McpError {
    fn from(err: DiscuteError) -> Self {
        match err {
            DiscuteError::ProgramNotFound(name) => McpError::ProgramNotFound { name },
            DiscuteError::LevelNotFound(level) => McpError::LevelNotFound { level },
            DiscuteError::MissingVariable { key, program } => {
                McpError::MissingVariable { key, program }
            }
            DiscuteError::DuplicateProgram(name) => McpError::ValidationFailed {
                field: "name".to_string(),
                message: format!("program '{}' already exists", name),
            },
            DiscuteError::InvalidInput(message) => McpError::ValidationFailed {
                field: "input".to_string(),
                message,
            },
            DiscuteError::Storage(message) => McpError::StorageError { message },
            DiscuteError::Io(e) => McpError::StorageError {
                message: format!("IO error: {}", e),
            },
            other => McpError::InternalError {
                message: other.to_string(),
            },
        }
    }
}

impl From<DiscuteError> for RmcpError {
    fn from(err: DiscuteError) -> Self {
        McpError::from(err).to_rmcp_error()
    }
}
