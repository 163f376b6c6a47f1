//! Prompt catalog: level-indexed queries and rendering over the template store.

mod import;
pub mod seed;
pub mod template;

use std::path::Path;

use tracing::{debug, info};

use crate::entity::{CefrLevel, CoachBand, NewProgram, ProgramInfo, PromptProgram};
use crate::error::{DiscuteError, Result};
use crate::store::TemplateStore;

pub use import::{CatalogFile, ImportReport, LevelEntry};
pub use template::Variables;

/// What `seed_defaults` inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub levels_created: usize,
    pub programs_created: usize,
}

/// The prompt catalog. Open it once at startup, pass it to whoever needs it
/// and close it at shutdown.
pub struct PromptCatalog {
    store: TemplateStore,
}

impl PromptCatalog {
    /// Open (creating if needed) the catalog database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_store(TemplateStore::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_store(TemplateStore::open_in_memory()?))
    }

    pub fn from_store(store: TemplateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn close(self) -> Result<()> {
        self.store.close()
    }

    /// Create the CEFR levels and the built-in programs that are not stored yet
    pub fn seed_defaults(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for level in CefrLevel::ALL {
            if self.store.create_level(level.as_str(), level.description())? {
                report.levels_created += 1;
            }
        }

        for seed in seed::SEED_PROGRAMS {
            if self.store.get_program(seed.name)?.is_some() {
                continue;
            }
            self.store.create_program(&seed.to_new_program())?;
            report.programs_created += 1;
        }

        info!(
            levels = report.levels_created,
            programs = report.programs_created,
            "seeded prompt catalog"
        );
        Ok(report)
    }

    pub fn create_level(&self, name: &str, description: &str) -> Result<bool> {
        self.store.create_level(name, description)
    }

    pub fn add_program(&self, program: &NewProgram) -> Result<i64> {
        self.store.create_program(program)
    }

    pub fn update_template(&self, name: &str, template: &str) -> Result<u32> {
        self.store.update_template(name, template)
    }

    pub fn levels(&self) -> Result<Vec<String>> {
        self.store.list_levels()
    }

    pub fn programs_for_level(&self, level: &str) -> Result<Vec<PromptProgram>> {
        self.store.list_programs_by_level(level)
    }

    pub fn all_programs(&self) -> Result<Vec<PromptProgram>> {
        self.store.list_all_programs()
    }

    /// Program names of a level; empty for unknown levels
    pub fn program_names_for_level(&self, level: &str) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_programs_by_level(level)?
            .into_iter()
            .map(|p| p.name)
            .collect())
    }

    /// First program of a level by name, if any
    pub fn default_program_for_level(&self, level: &str) -> Result<Option<String>> {
        Ok(self.program_names_for_level(level)?.into_iter().next())
    }

    /// First conversation program of a level, skipping the coach programs
    /// that share the level. This is what a chat session starts with.
    pub fn default_scenario_for_level(&self, level: &str) -> Result<Option<String>> {
        Ok(self
            .program_names_for_level(level)?
            .into_iter()
            .find(|name| !CoachBand::is_coach_program(name)))
    }

    /// Render a program's template with `variables`.
    ///
    /// In strict mode a missing variable is an error naming the first
    /// missing key. Otherwise the unmodified template comes back.
    pub fn render(&self, program: &str, variables: &Variables, strict: bool) -> Result<String> {
        let stored = self
            .store
            .get_program(program)?
            .ok_or_else(|| DiscuteError::ProgramNotFound(program.to_string()))?;

        debug!(program, strict, vars = variables.len(), "rendering prompt");
        template::render(&stored.template, variables, program, strict)
    }

    /// Render the coach program matching `level`'s band (beginner for unknown levels)
    pub fn coach_prompt_for_level(&self, level: &str, variables: &Variables) -> Result<String> {
        let band = CoachBand::for_level_name(level);
        self.render(band.program_name(), variables, true)
    }

    pub fn program_info(&self, name: &str) -> Result<Option<ProgramInfo>> {
        Ok(self.store.get_program(name)?.map(|p| p.info()))
    }

    /// Variable names a program's template expects
    pub fn placeholders(&self, name: &str) -> Result<Vec<String>> {
        let program = self
            .store
            .get_program(name)?
            .ok_or_else(|| DiscuteError::ProgramNotFound(name.to_string()))?;
        Ok(template::placeholders(&program.template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn seeded() -> PromptCatalog {
        let catalog = PromptCatalog::open_in_memory().unwrap();
        catalog.seed_defaults().unwrap();
        catalog
    }

    #[test]
    fn test_seeded_levels_appear_once() {
        let catalog = seeded();
        let levels = catalog.levels().unwrap();
        for level in CefrLevel::ALL {
            assert_eq!(levels.iter().filter(|l| *l == level.as_str()).count(), 1);
        }
        assert_eq!(levels.len(), 6);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let catalog = PromptCatalog::open_in_memory().unwrap();
        let first = catalog.seed_defaults().unwrap();
        assert_eq!(first.levels_created, 6);
        assert_eq!(first.programs_created, seed::SEED_PROGRAMS.len());

        let second = catalog.seed_defaults().unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(catalog.store().program_count().unwrap(), seed::SEED_PROGRAMS.len());
    }

    #[test]
    fn test_every_level_has_programs() {
        let catalog = seeded();
        for level in catalog.levels().unwrap() {
            assert!(!catalog.programs_for_level(&level).unwrap().is_empty());
        }
    }

    #[test]
    fn test_program_belongs_to_one_level_only() {
        let catalog = seeded();
        catalog
            .add_program(&NewProgram::new("Museum Tour", "B2", "Guide {ChatHistory}"))
            .unwrap();

        for level in catalog.levels().unwrap() {
            let names = catalog.program_names_for_level(&level).unwrap();
            assert_eq!(
                names.contains(&"Museum Tour".to_string()),
                level == "B2",
                "unexpected membership in {level}"
            );
        }
    }

    #[test]
    fn test_greet_scenario() {
        let catalog = PromptCatalog::open_in_memory().unwrap();
        catalog.create_level("B1", "Intermediate").unwrap();
        catalog
            .add_program(&NewProgram::new("Greet", "B1", "Hi {name}"))
            .unwrap();

        assert_eq!(
            catalog.render("Greet", &vars(&[("name", "Ana")]), true).unwrap(),
            "Hi Ana"
        );

        let err = catalog.render("Greet", &Variables::new(), true).unwrap_err();
        assert!(
            matches!(&err, DiscuteError::MissingVariable { key, program } if key == "name" && program == "Greet")
        );
        assert!(err.to_string().contains("'name'"));

        assert_eq!(
            catalog.render("Greet", &Variables::new(), false).unwrap(),
            "Hi {name}"
        );
    }

    #[test]
    fn test_render_unknown_program() {
        let catalog = seeded();
        let err = catalog
            .render("Nonexistent Program", &Variables::new(), true)
            .unwrap_err();
        assert!(matches!(err, DiscuteError::ProgramNotFound(n) if n == "Nonexistent Program"));
    }

    #[test]
    fn test_render_seeded_program_with_variables() {
        let catalog = seeded();
        let name = catalog.default_program_for_level("B1").unwrap().unwrap();
        let out = catalog
            .render(
                &name,
                &vars(&[("Context", "Test context"), ("ChatHistory", "Me: Hello")]),
                true,
            )
            .unwrap();
        assert!(out.contains("Test context"));
        assert!(out.contains("Me: Hello"));
    }

    #[test]
    fn test_lenient_render_of_seeded_program_is_unchanged() {
        let catalog = seeded();
        let stored = catalog.store().get_program("Ordering Food").unwrap().unwrap();
        let out = catalog
            .render("Ordering Food", &vars(&[("Context", "only this")]), false)
            .unwrap();
        assert_eq!(out, stored.template);
    }

    #[test]
    fn test_default_program_for_empty_level() {
        let catalog = PromptCatalog::open_in_memory().unwrap();
        catalog.create_level("C2", "Proficient").unwrap();
        assert_eq!(catalog.default_program_for_level("C2").unwrap(), None);
        assert_eq!(catalog.default_program_for_level("Unknown").unwrap(), None);
        assert!(catalog.program_names_for_level("InvalidLevel").unwrap().is_empty());
    }

    #[test]
    fn test_default_program_is_first_by_name() {
        let catalog = seeded();
        let names = catalog.program_names_for_level("A1").unwrap();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(
            catalog.default_program_for_level("A1").unwrap().as_ref(),
            names.first()
        );
    }

    #[test]
    fn test_default_scenario_skips_coach_programs() {
        let catalog = seeded();
        assert_eq!(
            catalog.default_program_for_level("A1").unwrap().as_deref(),
            Some("English Coach A1-A2")
        );
        assert_eq!(
            catalog.default_scenario_for_level("A1").unwrap().as_deref(),
            Some("Greetings and Introductions")
        );
        assert_eq!(
            catalog.default_scenario_for_level("B1").unwrap().as_deref(),
            Some("Airport Check-in")
        );
        assert_eq!(catalog.default_scenario_for_level("Z9").unwrap(), None);
    }

    #[test]
    fn test_coach_prompt_shares_program_within_band() {
        let catalog = seeded();
        let v = vars(&[("context", "At a café"), ("conversation", "Me: Hi")]);

        let a1 = catalog.coach_prompt_for_level("A1", &v).unwrap();
        let a2 = catalog.coach_prompt_for_level("A2", &v).unwrap();
        assert_eq!(a1, a2);
        assert!(a1.to_lowercase().contains("beginner"));

        let b2 = catalog.coach_prompt_for_level("B2", &v).unwrap();
        assert!(b2.to_lowercase().contains("intermediate"));
        let c2 = catalog.coach_prompt_for_level("C2", &v).unwrap();
        assert!(c2.to_lowercase().contains("advanced"));
        assert!(c2.contains("At a café"));

        let unknown = catalog.coach_prompt_for_level("Z9", &v).unwrap();
        assert_eq!(unknown, a1);

        // level names are matched exactly, like every other level lookup
        assert!(catalog.program_names_for_level("c2").unwrap().is_empty());
        assert_eq!(catalog.coach_prompt_for_level("c2", &v).unwrap(), a1);
    }

    #[test]
    fn test_coach_prompt_is_strict() {
        let catalog = seeded();
        let err = catalog
            .coach_prompt_for_level("B1", &vars(&[("context", "x")]))
            .unwrap_err();
        assert!(matches!(err, DiscuteError::MissingVariable { key, .. } if key == "conversation"));
    }

    #[test]
    fn test_program_info_round_trips_tags() {
        let catalog = seeded();
        catalog
            .add_program(
                &NewProgram::new("Tagged", "C1", "t")
                    .description("desc")
                    .tags(["zeta", "alpha", "mid"])
                    .difficulty("hard"),
            )
            .unwrap();

        let info = catalog.program_info("Tagged").unwrap().unwrap();
        assert_eq!(info.tags, vec!["zeta", "alpha", "mid"]);
        assert_eq!(info.level, "C1");
        assert_eq!(info.description, "desc");
        assert_eq!(info.difficulty, "hard");
        assert_eq!(info.version, 1);

        assert!(catalog.program_info("Invalid Program").unwrap().is_none());
    }

    #[test]
    fn test_placeholders_of_program() {
        let catalog = seeded();
        assert_eq!(
            catalog.placeholders("English Coach B1-B2").unwrap(),
            vec!["context", "conversation"]
        );
        assert!(catalog.placeholders("missing").unwrap_err().is_not_found());
    }
}
