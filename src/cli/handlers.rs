use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{PromptCatalog, Variables};
use crate::config::Config;
use crate::conversation::Conversation;
use crate::entity::{CefrLevel, NewProgram};
use crate::error::{DiscuteError, Result};
use crate::mcp::DiscuteServer;
use crate::services::GroqClient;
use crate::session::Session;
use crate::snapshot::generate_snapshot;

fn open_catalog(config: &Config) -> Result<PromptCatalog> {
    debug!(path = %config.db_path.display(), "opening prompt catalog");
    PromptCatalog::open(&config.db_path)
}

fn to_variables(vars: Vec<(String, String)>) -> Variables {
    vars.into_iter().collect()
}

/// Accept `b2` or ` B2 ` on the command line; other names pass through trimmed
fn cli_level(level: &str) -> String {
    level
        .parse::<CefrLevel>()
        .map(|l| l.to_string())
        .unwrap_or_else(|_| level.trim().to_string())
}

/// Template text from the flag, or from piped stdin
fn read_template(template: Option<String>, stdin: bool) -> Result<String> {
    if stdin {
        if atty::is(atty::Stream::Stdin) {
            return Err(DiscuteError::InvalidInput(
                "--stdin expects the template to be piped in".to_string(),
            ));
        }
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    template.ok_or_else(|| DiscuteError::InvalidInput("a template is required".to_string()))
}

pub fn handle_init(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let report = catalog.seed_defaults()?;

    println!(
        "Initialized prompt catalog in {}",
        config.db_path.display()
    );
    println!(
        "  {} levels and {} programs added",
        report.levels_created, report.programs_created
    );

    catalog.close()
}

pub fn handle_levels(config: &Config, json: bool) -> Result<()> {
    let catalog = open_catalog(config)?;
    let levels = catalog.levels()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&levels)?);
    } else if levels.is_empty() {
        println!("No levels found. Run 'discute init' first.");
    } else {
        for level in levels {
            let count = catalog.programs_for_level(&level)?.len();
            println!("  {}  ({} programs)", level, count);
        }
    }

    Ok(())
}

pub fn handle_programs(config: &Config, level: Option<String>, json: bool) -> Result<()> {
    let catalog = open_catalog(config)?;
    let programs = match level.as_deref().map(str::trim) {
        Some(level) => catalog.programs_for_level(&cli_level(level))?,
        None => catalog.all_programs()?,
    };

    if json {
        let infos: Vec<_> = programs.iter().map(|p| p.info()).collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else if programs.is_empty() {
        match level {
            Some(level) => println!("No programs found for level {}.", level.trim()),
            None => println!("No programs found. Run 'discute init' first."),
        }
    } else {
        println!("Programs:\n");
        for p in programs {
            println!("  [{}|{}] {}", p.level, p.difficulty, p.name);
            if !p.description.is_empty() {
                println!("      {}", p.description);
            }
            if !p.tags.is_empty() {
                println!("      tags: {}", p.tags.join(", "));
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct InfoOutput<'a> {
    #[serde(flatten)]
    info: &'a crate::entity::ProgramInfo,
    variables: &'a [String],
}

pub fn handle_info(config: &Config, name: String, json: bool) -> Result<()> {
    let catalog = open_catalog(config)?;
    let info = catalog
        .program_info(&name)?
        .ok_or_else(|| DiscuteError::ProgramNotFound(name.clone()))?;
    let variables = catalog.placeholders(&name)?;

    if json {
        let output = InfoOutput {
            info: &info,
            variables: &variables,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Program: {}", info.name);
        println!("Level: {}", info.level);
        println!("Difficulty: {}", info.difficulty);
        println!("Version: {}", info.version);
        if !info.description.is_empty() {
            println!("Description: {}", info.description);
        }
        if !info.tags.is_empty() {
            println!("Tags: {}", info.tags.join(", "));
        }
        if !variables.is_empty() {
            println!("Variables: {}", variables.join(", "));
        }
    }

    Ok(())
}

pub fn handle_render(
    config: &Config,
    name: String,
    vars: Vec<(String, String)>,
    lenient: bool,
) -> Result<()> {
    let catalog = open_catalog(config)?;
    let rendered = catalog.render(&name, &to_variables(vars), !lenient)?;
    println!("{}", rendered);
    Ok(())
}

pub fn handle_coach(config: &Config, level: String, vars: Vec<(String, String)>) -> Result<()> {
    let catalog = open_catalog(config)?;
    let level = cli_level(&level);
    let rendered = catalog.coach_prompt_for_level(&level, &to_variables(vars))?;
    println!("{}", rendered);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_add(
    config: &Config,
    name: String,
    level: String,
    description: String,
    tags: Vec<String>,
    difficulty: String,
    template: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let template = read_template(template, stdin)?;
    if name.trim().is_empty() {
        return Err(DiscuteError::InvalidInput(
            "program name must not be empty".to_string(),
        ));
    }

    let catalog = open_catalog(config)?;
    let program = NewProgram::new(name.trim(), cli_level(&level), template)
        .description(description)
        .tags(tags)
        .difficulty(difficulty);
    catalog.add_program(&program)?;
    info!(name = %program.name, level = %program.level, "program added");

    if json {
        let info = catalog
            .program_info(&program.name)?
            .ok_or_else(|| DiscuteError::ProgramNotFound(program.name.clone()))?;
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Added program '{}' to level {}", program.name, program.level);
    }

    Ok(())
}

pub fn handle_update(
    config: &Config,
    name: String,
    template: Option<String>,
    stdin: bool,
) -> Result<()> {
    let template = read_template(template, stdin)?;
    let catalog = open_catalog(config)?;
    let version = catalog.update_template(&name, &template)?;
    println!("Updated program '{}' (version {})", name, version);
    Ok(())
}

pub fn handle_import(config: &Config, file: PathBuf) -> Result<()> {
    let catalog = open_catalog(config)?;
    let report = catalog.import_file(&file)?;

    println!(
        "Imported {} programs from {}",
        report.imported.len(),
        file.display()
    );
    if report.levels_created > 0 {
        println!("  {} new levels", report.levels_created);
    }
    for name in &report.skipped {
        println!("  skipped '{}' (already exists)", name);
    }

    Ok(())
}

pub fn handle_snapshot(config: &Config, out: PathBuf) -> Result<()> {
    let catalog = open_catalog(config)?;
    let stats = generate_snapshot(&catalog, &out)?;

    println!("Snapshot written to {}", out.display());
    println!(
        "  {} levels, {} programs, {} files",
        stats.levels,
        stats.programs,
        stats.files_generated.len()
    );
    Ok(())
}

#[derive(Serialize)]
struct ChatOutput<'a> {
    session: &'a Session,
    #[serde(skip_serializing_if = "Option::is_none")]
    review: Option<String>,
}

fn read_audio(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        DiscuteError::InvalidInput(format!("cannot read audio file {}: {}", path.display(), e))
    })
}

#[allow(clippy::too_many_arguments)]
pub fn handle_chat(
    config: &Config,
    audio: Vec<PathBuf>,
    level: Option<String>,
    program: Option<String>,
    context: Option<String>,
    review: bool,
    json: bool,
) -> Result<()> {
    let client = GroqClient::from_config(config)?;
    let catalog = open_catalog(config)?;
    let conversation = Conversation::new(&catalog, &client, &client, config.chat_model.clone());

    let mut session = Session::new(&catalog)?;
    if let Some(level) = level {
        conversation.select_level(&mut session, &cli_level(&level))?;
    }
    if let Some(program) = program {
        conversation.select_program(&mut session, &program)?;
    }
    session.context = context.unwrap_or_default();

    for path in &audio {
        let bytes = read_audio(path)?;
        conversation.send_audio(&mut session, bytes)?;
        if !json {
            let mut recent = session.turns.iter().rev().take(2).collect::<Vec<_>>();
            recent.reverse();
            for turn in recent {
                println!("{}: {}", turn.role.label(), turn.content);
            }
            println!();
        }
    }

    let review = if review {
        Some(conversation.review(&session)?)
    } else {
        None
    };

    if json {
        let output = ChatOutput {
            session: &session,
            review,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Some(review) = review {
        println!("Coach ({}):\n", session.selected_level);
        println!("{}", review);
    }

    Ok(())
}

pub fn handle_serve(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    info!(path = %config.db_path.display(), "starting MCP server on stdio");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime
        .block_on(DiscuteServer::new(catalog).serve(rmcp::transport::stdio()))
        .map_err(|e| DiscuteError::Service(format!("MCP server failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_variables_last_wins() {
        let vars = to_variables(vec![
            ("name".to_string(), "Ana".to_string()),
            ("name".to_string(), "Bo".to_string()),
        ]);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["name"], "Bo");
    }

    #[test]
    fn test_read_template_from_flag() {
        assert_eq!(read_template(Some("Hi {name}".to_string()), false).unwrap(), "Hi {name}");
        assert!(matches!(
            read_template(None, false),
            Err(DiscuteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cli_level_normalizes_cefr_names() {
        assert_eq!(cli_level("b2"), "B2");
        assert_eq!(cli_level(" C1 "), "C1");
        assert_eq!(cli_level(" Custom "), "Custom");
    }

    #[test]
    fn test_read_audio_missing_file() {
        let err = read_audio(Path::new("/nonexistent/clip.wav")).unwrap_err();
        assert!(err.to_string().contains("clip.wav"));
    }
}
