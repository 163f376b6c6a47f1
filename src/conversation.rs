//! Chat turns and coach reviews: session state + catalog + services.

use tracing::{debug, info};

use crate::catalog::{PromptCatalog, Variables};
use crate::error::{DiscuteError, Result};
use crate::services::{Generator, Transcriber};
use crate::session::{format_history, Session, Turn};

pub struct Conversation<'a> {
    catalog: &'a PromptCatalog,
    transcriber: &'a dyn Transcriber,
    generator: &'a dyn Generator,
    model: String,
}

impl<'a> Conversation<'a> {
    pub fn new(
        catalog: &'a PromptCatalog,
        transcriber: &'a dyn Transcriber,
        generator: &'a dyn Generator,
        model: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            transcriber,
            generator,
            model: model.into(),
        }
    }

    /// Switch level. Keeps the selected program if the new level offers it,
    /// otherwise selects the level's first scenario (or nothing).
    pub fn select_level(&self, session: &mut Session, level: &str) -> Result<()> {
        if !self.catalog.levels()?.iter().any(|l| l == level) {
            return Err(DiscuteError::LevelNotFound(level.to_string()));
        }

        let names = self.catalog.program_names_for_level(level)?;
        if !names.contains(&session.selected_program) {
            session.selected_program = self
                .catalog
                .default_scenario_for_level(level)?
                .unwrap_or_default();
        }
        session.selected_level = level.to_string();
        Ok(())
    }

    /// Select a program offered by the session's current level
    pub fn select_program(&self, session: &mut Session, program: &str) -> Result<()> {
        let names = self.catalog.program_names_for_level(&session.selected_level)?;
        if !names.iter().any(|n| n == program) {
            return Err(DiscuteError::ProgramNotFound(program.to_string()));
        }
        session.selected_program = program.to_string();
        Ok(())
    }

    /// Transcribe a recording and answer it
    pub fn send_audio(&self, session: &mut Session, audio: Vec<u8>) -> Result<String> {
        let text = self.transcriber.transcribe(&audio)?;
        debug!(chars = text.len(), "transcribed learner audio");
        self.respond(session, Turn::me(text, Some(audio)))
    }

    /// Answer a typed message
    pub fn send_text(&self, session: &mut Session, text: impl Into<String>) -> Result<String> {
        self.respond(session, Turn::me(text, None))
    }

    /// Renders and generates before touching the session, so a failure
    /// leaves it as it was.
    fn respond(&self, session: &mut Session, turn: Turn) -> Result<String> {
        let program = self.active_program(session)?;
        let history = format_history(session.turns.iter().chain(std::iter::once(&turn)));

        let mut variables = Variables::new();
        variables.insert("Context".to_string(), session.context.clone());
        variables.insert("ChatHistory".to_string(), history);

        let prompt = self.catalog.render(&program, &variables, true)?;
        let reply = self.generator.generate(&prompt, &self.model)?;
        info!(program = %program, turns = session.turns.len() + 2, "assistant replied");

        session.turns.push(turn);
        session.turns.push(Turn::you(reply.clone()));
        Ok(reply)
    }

    fn active_program(&self, session: &Session) -> Result<String> {
        if !session.selected_program.is_empty() {
            return Ok(session.selected_program.clone());
        }
        self.catalog
            .default_scenario_for_level(&session.selected_level)?
            .ok_or_else(|| DiscuteError::NoPrograms(session.selected_level.clone()))
    }

    /// Coach feedback on the conversation so far
    pub fn review(&self, session: &Session) -> Result<String> {
        if session.is_empty() {
            return Err(DiscuteError::EmptyConversation);
        }

        let mut variables = Variables::new();
        variables.insert("context".to_string(), session.context.clone());
        variables.insert("conversation".to_string(), session.chat_history());

        let prompt = self
            .catalog
            .coach_prompt_for_level(&session.selected_level, &variables)?;
        self.generator.generate(&prompt, &self.model)
    }
}
