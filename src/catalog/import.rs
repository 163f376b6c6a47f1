use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::PromptCatalog;
use crate::entity::NewProgram;
use crate::error::Result;

/// A YAML catalog file.
///
/// ```yaml
/// levels:
///   - name: B1
///     description: Intermediate
/// programs:
///   - name: Museum Tour
///     level: B1
///     template: "You are a museum guide.\n{ChatHistory}\nYou:"
///     tags: [culture]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub levels: Vec<LevelEntry>,
    #[serde(default)]
    pub programs: Vec<NewProgram>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub levels_created: usize,
    pub imported: Vec<String>,
    /// Programs left alone because the name was already taken
    pub skipped: Vec<String>,
}

impl CatalogFile {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }
}

impl PromptCatalog {
    /// Add the levels and programs of a catalog file. Existing program names
    /// are skipped; a program under an unknown level aborts the import and
    /// nothing from the file is kept.
    pub fn import(&self, file: &CatalogFile) -> Result<ImportReport> {
        self.store().in_transaction(|store| {
            let mut report = ImportReport::default();

            for level in &file.levels {
                if store.create_level(&level.name, &level.description)? {
                    report.levels_created += 1;
                }
            }

            for program in &file.programs {
                if store.get_program(&program.name)?.is_some() {
                    warn!(name = %program.name, "program already exists, skipping");
                    report.skipped.push(program.name.clone());
                    continue;
                }
                store.create_program(program)?;
                report.imported.push(program.name.clone());
            }

            Ok(report)
        })
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportReport> {
        self.import(&CatalogFile::load(path)?)
    }
}
