//! MCP tool parameter types and helpers.
//!
//! The tool implementations live in mod.rs within the #[tool_router] impl
//! block.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::Variables;
use crate::entity::ProgramInfo;
use crate::mcp::error::McpError;

/// Parameters for list_programs tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListProgramsParams {
    /// CEFR level name, e.g. "B1"
    pub level: String,
}

/// Parameters for program_info tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProgramInfoParams {
    /// Exact program name
    pub name: String,
}

/// Parameters for render_prompt tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderPromptParams {
    /// Exact program name
    pub name: String,
    /// Values for the template's {placeholders}
    pub variables: Option<HashMap<String, String>>,
    /// Fail on missing variables (default true). When false, a missing
    /// variable returns the template unmodified.
    pub strict: Option<bool>,
}

/// Parameters for coach_prompt tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoachPromptParams {
    /// CEFR level; unknown levels get the beginner coach
    pub level: String,
    /// Usually `context` and `conversation`
    pub variables: Option<HashMap<String, String>>,
}

/// program_info response: the stored metadata plus template variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramInfoResponse {
    #[serde(flatten)]
    pub info: ProgramInfo,
    pub variables: Vec<String>,
}

/// Reject blank names before touching the catalog
pub fn validate_name(field: &str, value: &str) -> Result<(), McpError> {
    if value.trim().is_empty() {
        return Err(McpError::ValidationFailed {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

pub fn to_variables(vars: Option<HashMap<String, String>>) -> Variables {
    vars.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Greet").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("level", "   ").is_err());
    }

    #[test]
    fn test_render_params_defaults() {
        let params: RenderPromptParams = serde_json::from_str(r#"{"name":"Greet"}"#).unwrap();
        assert!(params.variables.is_none());
        assert!(params.strict.is_none());
        assert!(to_variables(params.variables).is_empty());
    }

    #[test]
    fn test_info_response_is_flat() {
        let response = ProgramInfoResponse {
            info: ProgramInfo {
                name: "Greet".to_string(),
                description: String::new(),
                level: "B1".to_string(),
                tags: vec![],
                difficulty: "easy".to_string(),
                version: 1,
            },
            variables: vec!["name".to_string()],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["level"], "B1");
        assert_eq!(json["variables"][0], "name");
    }
}
