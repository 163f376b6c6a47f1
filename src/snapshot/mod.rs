// src/snapshot/mod.rs
//! Snapshot generation module
//!
//! Writes the prompt catalog as browsable markdown: one file per program,
//! grouped in a directory per CEFR level, plus a README index.

mod program;
mod readme;
pub mod utils;

use std::path::Path;

use chrono::Utc;

use crate::catalog::PromptCatalog;
use crate::Result;

pub use self::utils::{format_date, format_timestamp, slugify};

/// Statistics about generated snapshot
#[derive(Debug, Default)]
pub struct SnapshotStats {
    pub levels: usize,
    pub programs: usize,
    pub files_generated: Vec<String>,
}

/// Result of generating a single program file
pub struct GeneratedFile {
    pub relative_path: String,
    pub level: String,
    pub name: String,
    pub description: String,
    pub difficulty: String,
}

/// Generate markdown snapshots for the whole catalog
///
/// Clears `snapshot_dir` first, so stale files from renamed programs vanish.
pub fn generate_snapshot(catalog: &PromptCatalog, snapshot_dir: &Path) -> Result<SnapshotStats> {
    utils::clear_snapshot_dir(snapshot_dir)?;
    std::fs::create_dir_all(snapshot_dir)?;

    let levels = catalog.levels()?;
    let programs = catalog.all_programs()?;

    let files = program::generate(&programs, snapshot_dir)?;

    let mut stats = SnapshotStats {
        levels: levels.len(),
        programs: files.len(),
        files_generated: files.iter().map(|f| f.relative_path.clone()).collect(),
    };

    // README must be last so it can link every file
    readme::generate(&levels, &files, snapshot_dir)?;
    stats.files_generated.push("README.md".to_string());

    Ok(stats)
}

/// Generate YAML frontmatter block
pub fn yaml_frontmatter<T: serde::Serialize>(data: &T) -> Result<String> {
    let yaml = serde_yaml::to_string(data)?;
    Ok(format!("---\n{}---\n", yaml))
}

/// Get current timestamp for "last updated" footers
pub fn current_timestamp() -> String {
    format_timestamp(&Utc::now())
}
