use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{
    Config, DEFAULT_API_BASE, DEFAULT_CHAT_MODEL, DEFAULT_DB_PATH, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TRANSCRIPTION_MODEL,
};

#[derive(Parser, Debug)]
#[command(name = "discute")]
#[command(version, about = "Practice a language by talking, with CEFR-levelled prompts and an AI coach")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Prompt catalog database
    #[arg(long, global = true, env = "DISCUTE_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// API key for transcription and generation
    #[arg(long, global = true, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true, env = "DISCUTE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Model used for replies and coach reviews
    #[arg(long, global = true, env = "DISCUTE_CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    pub model: String,

    /// Speech-to-text model
    #[arg(long, global = true, env = "DISCUTE_TRANSCRIPTION_MODEL", default_value = DEFAULT_TRANSCRIPTION_MODEL)]
    pub transcription_model: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            db_path: self.db.clone(),
            api_base: self.api_base.clone(),
            chat_model: self.model.clone(),
            transcription_model: self.transcription_model.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Parse a `key=value` template variable
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the catalog and load the CEFR levels and built-in programs
    Init,

    /// List CEFR levels
    Levels {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List prompt programs, optionally for one level
    Programs {
        /// CEFR level (A1..C2)
        #[arg(value_name = "LEVEL")]
        level: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of a prompt program
    Info {
        /// Program name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a prompt program with variables
    Render {
        /// Program name
        name: String,

        /// Template variable (can be specified multiple times)
        #[arg(long = "var", short = 'v', value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Print the template unchanged instead of failing on missing variables
        #[arg(long)]
        lenient: bool,
    },

    /// Render the coach prompt for a CEFR level
    Coach {
        /// CEFR level (unknown levels use the beginner coach)
        level: String,

        /// Template variable (can be specified multiple times)
        #[arg(long = "var", short = 'v', value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },

    /// Add a prompt program
    Add {
        /// Program name (unique across the catalog)
        name: String,

        /// CEFR level the program belongs to
        #[arg(long, short = 'l')]
        level: String,

        /// Short description
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Tags (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Difficulty label
        #[arg(long, default_value = crate::entity::DEFAULT_DIFFICULTY)]
        difficulty: String,

        /// Template text
        #[arg(long, conflicts_with = "stdin", required_unless_present = "stdin")]
        template: Option<String>,

        /// Read the template from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the template of a prompt program
    Update {
        /// Program name
        name: String,

        /// New template text
        #[arg(long, conflicts_with = "stdin", required_unless_present = "stdin")]
        template: Option<String>,

        /// Read the template from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Import programs from a YAML catalog file
    Import {
        /// YAML file with `levels` and `programs`
        file: PathBuf,
    },

    /// Write the catalog as markdown files
    Snapshot {
        /// Output directory (replaced on each run)
        #[arg(long, short = 'o', default_value = "snapshot")]
        out: PathBuf,
    },

    /// Send voice recordings and get replies, optionally followed by a coach review
    Chat {
        /// WAV recordings, sent in order
        #[arg(long = "audio", short = 'a', required = true)]
        audio: Vec<PathBuf>,

        /// CEFR level
        #[arg(long, short = 'l')]
        level: Option<String>,

        /// Conversation program (defaults to the level's first program)
        #[arg(long, short = 'p')]
        program: Option<String>,

        /// Free-text context for the conversation
        #[arg(long, short = 'c')]
        context: Option<String>,

        /// Ask the coach to review the conversation afterwards
        #[arg(long)]
        review: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the MCP server on stdio
    Serve,
}
