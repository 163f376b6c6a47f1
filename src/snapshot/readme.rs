// src/snapshot/readme.rs
//! README index generation for snapshot

use std::path::Path;

use crate::entity::CefrLevel;
use crate::Result;

use super::current_timestamp;
use super::utils::write_snapshot_file;
use super::GeneratedFile;

fn level_heading(level: &str) -> String {
    match level.parse::<CefrLevel>() {
        Ok(l) => format!("{} - {}", l, l.description()),
        Err(_) => level.to_string(),
    }
}

/// Generate README.md index
pub fn generate(levels: &[String], files: &[GeneratedFile], snapshot_dir: &Path) -> Result<()> {
    let mut content = String::from("# Prompt Catalog\n\n");
    content.push_str("> Auto-generated by `discute snapshot`. Do not edit directly.\n\n");

    // Summary table
    content.push_str("## Summary\n\n");
    content.push_str("| Level | Programs |\n");
    content.push_str("|-------|----------|\n");
    for level in levels {
        let count = files.iter().filter(|f| &f.level == level).count();
        content.push_str(&format!("| {} | {} |\n", level, count));
    }
    content.push('\n');

    if files.is_empty() {
        content.push_str("*No programs yet. Run `discute init` to load the built-in catalog.*\n\n");
    } else {
        for level in levels {
            let in_level: Vec<&GeneratedFile> = files.iter().filter(|f| &f.level == level).collect();
            if in_level.is_empty() {
                continue;
            }

            content.push_str(&format!("## {}\n\n", level_heading(level)));
            for file in in_level {
                let description = if file.description.is_empty() {
                    String::new()
                } else {
                    format!(" - {}", file.description)
                };
                content.push_str(&format!(
                    "- [{}]({}) `{}`{}\n",
                    file.name, file.relative_path, file.difficulty, description
                ));
            }
            content.push('\n');
        }
    }

    content.push_str(&format!("---\n\n_Last updated: {}_\n", current_timestamp()));

    write_snapshot_file(&snapshot_dir.join("README.md"), &content)
}
