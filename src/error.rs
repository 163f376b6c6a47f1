use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscuteError {
    #[error("CEFR level not found: {0}")]
    LevelNotFound(String),

    #[error("Prompt program '{0}' not found.")]
    ProgramNotFound(String),

    #[error("Missing variable: '{key}' in prompt '{program}'.")]
    MissingVariable { key: String, program: String },

    #[error("Prompt program '{0}' already exists.")]
    DuplicateProgram(String),

    #[error("No conversation programs available for level {0}. Run 'discute init' first.")]
    NoPrograms(String),

    #[error("No conversation to review yet.")]
    EmptyConversation,

    #[error("No API key configured. Pass --api-key or set GROQ_API_KEY.")]
    MissingApiKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DiscuteError {
    /// True for the lookup failures callers usually surface as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DiscuteError::LevelNotFound(_) | DiscuteError::ProgramNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DiscuteError>;
