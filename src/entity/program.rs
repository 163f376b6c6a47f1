use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DIFFICULTY: &str = "medium";

/// A stored prompt program joined with its level name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptProgram {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub level: String,
    /// Template text with `{name}` placeholders
    pub template: String,
    pub tags: Vec<String>,
    pub difficulty: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromptProgram {
    pub fn info(&self) -> ProgramInfo {
        ProgramInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            level: self.level.clone(),
            tags: self.tags.clone(),
            difficulty: self.difficulty.clone(),
            version: self.version,
        }
    }
}

/// Input for creating a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgram {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub level: String,
    pub template: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

impl NewProgram {
    pub fn new(name: impl Into<String>, level: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            level: level.into(),
            template: template.into(),
            tags: Vec::new(),
            difficulty: default_difficulty(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }
}

/// Summary shown next to a program selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramInfo {
    pub name: String,
    pub description: String,
    pub level: String,
    pub tags: Vec<String>,
    pub difficulty: String,
    pub version: u32,
}
