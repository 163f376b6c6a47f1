// src/snapshot/program.rs
//! Program snapshot generation

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use crate::catalog::template::placeholders;
use crate::entity::PromptProgram;
use crate::Result;

use super::utils::{format_date, slugify, write_snapshot_file};
use super::{yaml_frontmatter, GeneratedFile};

#[derive(Serialize)]
struct ProgramFrontmatter {
    name: String,
    level: String,
    difficulty: String,
    version: u32,
    created: String,
    updated: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    variables: Vec<String>,
}

impl ProgramFrontmatter {
    fn from_program(program: &PromptProgram) -> Self {
        Self {
            name: program.name.clone(),
            level: program.level.clone(),
            difficulty: program.difficulty.clone(),
            version: program.version,
            created: format_date(&program.created_at),
            updated: format_date(&program.updated_at),
            tags: program.tags.clone(),
            variables: placeholders(&program.template),
        }
    }
}

/// Generate markdown body for a program
fn generate_body(program: &PromptProgram) -> String {
    let mut body = format!("\n# {}\n\n", program.name);

    if !program.description.is_empty() {
        body.push_str(&program.description);
        body.push('\n');
    }

    body.push_str("\n## Template\n\n");
    // Fence longer than any backtick run inside the template
    let longest_run = program
        .template
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    body.push_str(&fence);
    body.push_str("text\n");
    body.push_str(&program.template);
    if !program.template.ends_with('\n') {
        body.push('\n');
    }
    body.push_str(&fence);
    body.push('\n');

    body
}

/// Generate a unique filename, handling collisions
fn unique_filename(base_slug: &str, id: i64, used_slugs: &mut HashSet<String>) -> String {
    let candidate = base_slug.to_string();

    if used_slugs.insert(candidate.clone()) {
        format!("{}.md", candidate)
    } else {
        let unique = format!("{}-{}", base_slug, id);
        used_slugs.insert(unique.clone());
        format!("{}.md", unique)
    }
}

/// Write one file per program under `<level>/`
pub fn generate(programs: &[PromptProgram], snapshot_dir: &Path) -> Result<Vec<GeneratedFile>> {
    let mut generated = Vec::new();
    let mut used_slugs = HashSet::new();

    for program in programs {
        let frontmatter = ProgramFrontmatter::from_program(program);
        let content = format!("{}{}", yaml_frontmatter(&frontmatter)?, generate_body(program));

        let level_dir = slugify(&program.level);
        let slug = format!("{}/{}", level_dir, slugify(&program.name));
        let filename = unique_filename(&slug, program.id, &mut used_slugs);

        write_snapshot_file(&snapshot_dir.join(&filename), &content)?;

        generated.push(GeneratedFile {
            relative_path: filename,
            level: program.level.clone(),
            name: program.name.clone(),
            description: program.description.clone(),
            difficulty: program.difficulty.clone(),
        });
    }

    Ok(generated)
}
