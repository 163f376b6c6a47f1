//! Per-user conversation state. Lives for one process; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::catalog::PromptCatalog;
use crate::entity::CefrLevel;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The learner
    Me,
    /// The assistant
    You,
}

impl Role {
    /// Capitalized tag used in formatted history
    pub fn label(&self) -> &'static str {
        match self {
            Role::Me => "Me",
            Role::You => "You",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Me => write!(f, "me"),
            Role::You => write!(f, "you"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Recorded audio for learner turns
    #[serde(skip)]
    pub audio: Option<Vec<u8>>,
}

impl Turn {
    pub fn me(content: impl Into<String>, audio: Option<Vec<u8>>) -> Self {
        Self {
            role: Role::Me,
            content: content.into(),
            audio,
        }
    }

    pub fn you(content: impl Into<String>) -> Self {
        Self {
            role: Role::You,
            content: content.into(),
            audio: None,
        }
    }
}

/// One line per turn: `Me: ...` / `You: ...`
pub fn format_history<'a, I>(turns: I) -> String
where
    I: IntoIterator<Item = &'a Turn>,
{
    turns
        .into_iter()
        .map(|t| format!("{}: {}", t.role.label(), t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub context: String,
    pub turns: Vec<Turn>,
    pub selected_level: String,
    /// Empty when the level has no programs
    pub selected_program: String,
}

impl Session {
    /// A fresh session at the beginner level with its first conversation
    /// scenario selected
    pub fn new(catalog: &PromptCatalog) -> Result<Self> {
        let level = CefrLevel::default().to_string();
        let program = catalog
            .default_scenario_for_level(&level)?
            .unwrap_or_default();

        Ok(Self {
            context: String::new(),
            turns: Vec::new(),
            selected_level: level,
            selected_program: program,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn chat_history(&self) -> String {
        format_history(&self.turns)
    }
}
