pub mod catalog;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod entity;
pub mod error;
pub mod mcp;
pub mod services;
pub mod session;
pub mod snapshot;
pub mod store;

pub use catalog::PromptCatalog;
pub use config::Config;
pub use conversation::Conversation;
pub use error::{DiscuteError, Result};
pub use mcp::DiscuteServer;
pub use session::Session;
