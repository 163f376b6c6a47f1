use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::debug;

use crate::entity::{NewProgram, PromptProgram};
use crate::error::{DiscuteError, Result};

const PROGRAM_COLUMNS: &str = "p.id, p.name, p.description, l.level_name, p.prompt_template,
                               p.tags, p.difficulty, p.version, p.created_at, p.updated_at";

const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQLite-backed store for CEFR levels and prompt programs
pub struct TemplateStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl TemplateStore {
    /// Open or create the catalog database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened template store");

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    /// Location of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| DiscuteError::from(e))
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS cefr_levels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level_name TEXT UNIQUE NOT NULL,
                description TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS prompt_programs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                description TEXT,
                cefr_level_id INTEGER NOT NULL,
                prompt_template TEXT NOT NULL,
                tags TEXT,
                difficulty TEXT DEFAULT 'medium',
                version INTEGER DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (cefr_level_id) REFERENCES cefr_levels(id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cefr_level ON prompt_programs(cefr_level_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_program_name ON prompt_programs(name)",
            [],
        )?;

        Ok(())
    }

    /// Insert a level; returns false when it already existed
    pub fn create_level(&self, name: &str, description: &str) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO cefr_levels (level_name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(inserted > 0)
    }

    /// Row id of a level, if it exists
    pub fn level_id(&self, name: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM cefr_levels WHERE level_name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Insert a new program under an existing level
    pub fn create_program(&self, program: &NewProgram) -> Result<i64> {
        let level_id = self
            .level_id(&program.level)?
            .ok_or_else(|| DiscuteError::LevelNotFound(program.level.clone()))?;

        let tags = serde_json::to_string(&program.tags)?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO prompt_programs
                 (name, description, cefr_level_id, prompt_template, tags, difficulty, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    program.name,
                    program.description,
                    level_id,
                    program.template,
                    tags,
                    program.difficulty,
                    now,
                ],
            )
            .map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => {
                    DiscuteError::DuplicateProgram(program.name.clone())
                }
                _ => DiscuteError::from(e),
            })?;

        let id = self.conn.last_insert_rowid();
        debug!(name = %program.name, level = %program.level, id, "created prompt program");
        Ok(id)
    }

    /// All level names in lexical order
    pub fn list_levels(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT level_name FROM cefr_levels ORDER BY level_name")?;

        let levels = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(levels)
    }

    /// Programs of one level ordered by name
    pub fn list_programs_by_level(&self, level: &str) -> Result<Vec<PromptProgram>> {
        let sql = format!(
            "SELECT {PROGRAM_COLUMNS}
             FROM prompt_programs p
             JOIN cefr_levels l ON p.cefr_level_id = l.id
             WHERE l.level_name = ?1
             ORDER BY p.name"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let programs = stmt
            .query_map([level], row_to_program)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(programs)
    }

    /// Every program ordered by level, then name
    pub fn list_all_programs(&self) -> Result<Vec<PromptProgram>> {
        let sql = format!(
            "SELECT {PROGRAM_COLUMNS}
             FROM prompt_programs p
             JOIN cefr_levels l ON p.cefr_level_id = l.id
             ORDER BY l.level_name, p.name"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let programs = stmt
            .query_map([], row_to_program)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(programs)
    }

    /// Look up a program by exact name
    pub fn get_program(&self, name: &str) -> Result<Option<PromptProgram>> {
        let sql = format!(
            "SELECT {PROGRAM_COLUMNS}
             FROM prompt_programs p
             JOIN cefr_levels l ON p.cefr_level_id = l.id
             WHERE p.name = ?1"
        );

        let program = self
            .conn
            .query_row(&sql, [name], row_to_program)
            .optional()?;
        Ok(program)
    }

    /// Replace a program's template, bumping its version. Returns the new version.
    pub fn update_template(&self, name: &str, template: &str) -> Result<u32> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE prompt_programs
             SET prompt_template = ?1, version = version + 1, updated_at = ?2
             WHERE name = ?3",
            params![template, now, name],
        )?;

        if updated == 0 {
            return Err(DiscuteError::ProgramNotFound(name.to_string()));
        }

        let version: u32 = self.conn.query_row(
            "SELECT version FROM prompt_programs WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;
        debug!(name, version, "updated prompt template");
        Ok(version)
    }

    /// Run `f` in a transaction. An error from `f` rolls back everything it wrote.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    /// Number of stored programs
    pub fn program_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prompt_programs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_program(row: &Row<'_>) -> rusqlite::Result<PromptProgram> {
    let tags: Option<String> = row.get(5)?;
    let difficulty: Option<String> = row.get(6)?;
    let version: Option<u32> = row.get(7)?;

    Ok(PromptProgram {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        level: row.get(3)?,
        template: row.get(4)?,
        tags: decode_tags(tags.as_deref()),
        difficulty: difficulty.unwrap_or_else(|| crate::entity::DEFAULT_DIFFICULTY.to_string()),
        version: version.unwrap_or(1),
        created_at: parse_timestamp(row, 8)?,
        updated_at: parse_timestamp(row, 9)?,
    })
}

/// Tags are stored as a JSON array; anything else decodes to no tags
fn decode_tags(raw: Option<&str>) -> Vec<String> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// RFC 3339, or SQLite's `CURRENT_TIMESTAMP` form (`YYYY-MM-DD HH:MM:SS`, UTC)
/// found in databases whose rows were filled by column defaults.
fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&raw, SQLITE_TIMESTAMP_FORMAT).map(|dt| dt.and_utc())
        })
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

impl From<rusqlite::Error> for DiscuteError {
    fn from(e: rusqlite::Error) -> Self {
        DiscuteError::Storage(format!("SQLite error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_level(level: &str) -> TemplateStore {
        let store = TemplateStore::open_in_memory().unwrap();
        store.create_level(level, "test level").unwrap();
        store
    }

    #[test]
    fn test_open_creates_db() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prompts.db");
        let store = TemplateStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
        store.close().unwrap();
    }

    #[test]
    fn test_create_level_is_idempotent() {
        let store = TemplateStore::open_in_memory().unwrap();
        assert!(store.create_level("B1", "Intermediate").unwrap());
        assert!(!store.create_level("B1", "Something else").unwrap());
        assert_eq!(store.list_levels().unwrap(), vec!["B1".to_string()]);
    }

    #[test]
    fn test_levels_are_lexically_ordered() {
        let store = TemplateStore::open_in_memory().unwrap();
        for level in ["C2", "A1", "B2", "A2"] {
            store.create_level(level, "").unwrap();
        }
        assert_eq!(store.list_levels().unwrap(), vec!["A1", "A2", "B2", "C2"]);
    }

    #[test]
    fn test_create_program_requires_level() {
        let store = TemplateStore::open_in_memory().unwrap();
        let err = store
            .create_program(&NewProgram::new("Greet", "B1", "Hi {name}"))
            .unwrap_err();
        assert!(matches!(err, DiscuteError::LevelNotFound(l) if l == "B1"));
    }

    #[test]
    fn test_duplicate_program_name_rejected() {
        let store = TemplateStore::open_in_memory().unwrap();
        store.create_level("A1", "").unwrap();
        store.create_level("B1", "").unwrap();
        store
            .create_program(&NewProgram::new("Greet", "A1", "Hi"))
            .unwrap();

        let err = store
            .create_program(&NewProgram::new("Greet", "B1", "Hello"))
            .unwrap_err();
        assert!(matches!(err, DiscuteError::DuplicateProgram(n) if n == "Greet"));
        assert_eq!(store.program_count().unwrap(), 1);
    }

    #[test]
    fn test_programs_by_level_ordered_with_tags() {
        let store = store_with_level("B1");
        store.create_level("B2", "").unwrap();
        store
            .create_program(&NewProgram::new("Zoo Visit", "B1", "zoo").tags(["animals"]))
            .unwrap();
        store
            .create_program(
                &NewProgram::new("Airport", "B1", "air")
                    .description("Checking in")
                    .tags(["travel", "vocabulary", "fluency"]),
            )
            .unwrap();
        store
            .create_program(&NewProgram::new("Interview", "B2", "job"))
            .unwrap();

        let programs = store.list_programs_by_level("B1").unwrap();
        let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Airport", "Zoo Visit"]);
        assert_eq!(programs[0].tags, vec!["travel", "vocabulary", "fluency"]);
        assert_eq!(programs[0].description, "Checking in");
        assert_eq!(programs[0].difficulty, "medium");
        assert_eq!(programs[0].version, 1);

        assert!(store.list_programs_by_level("C1").unwrap().is_empty());
        assert!(store.list_programs_by_level("nope").unwrap().is_empty());
    }

    #[test]
    fn test_all_programs_ordered_by_level_then_name() {
        let store = TemplateStore::open_in_memory().unwrap();
        store.create_level("A1", "").unwrap();
        store.create_level("C1", "").unwrap();
        store.create_program(&NewProgram::new("b", "C1", "t")).unwrap();
        store.create_program(&NewProgram::new("z", "A1", "t")).unwrap();
        store.create_program(&NewProgram::new("a", "C1", "t")).unwrap();

        let all = store.list_all_programs().unwrap();
        let keys: Vec<(String, String)> = all
            .into_iter()
            .map(|p| (p.level, p.name))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("A1".to_string(), "z".to_string()),
                ("C1".to_string(), "a".to_string()),
                ("C1".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_template_bumps_version() {
        let store = store_with_level("A2");
        store
            .create_program(&NewProgram::new("Cafe", "A2", "old {x}"))
            .unwrap();
        let before = store.get_program("Cafe").unwrap().unwrap();

        let version = store.update_template("Cafe", "new {x}").unwrap();
        assert_eq!(version, 2);

        let after = store.get_program("Cafe").unwrap().unwrap();
        assert_eq!(after.template, "new {x}");
        assert_eq!(after.version, 2);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);

        let err = store.update_template("Missing", "x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_tags_decode_to_empty() {
        assert!(decode_tags(None).is_empty());
        assert!(decode_tags(Some("")).is_empty());
        assert!(decode_tags(Some("not json")).is_empty());
        assert_eq!(decode_tags(Some(r#"["a","b"]"#)), vec!["a", "b"]);
    }

    #[test]
    fn test_data_persists_across_opens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prompts.db");

        let store = TemplateStore::open(&path).unwrap();
        store.create_level("B1", "Intermediate").unwrap();
        store
            .create_program(&NewProgram::new("Persistence Test", "B1", "Test template").tags(["test"]))
            .unwrap();
        store.close().unwrap();

        let reopened = TemplateStore::open(&path).unwrap();
        let program = reopened.get_program("Persistence Test").unwrap().unwrap();
        assert_eq!(program.level, "B1");
        assert_eq!(program.tags, vec!["test"]);
    }

    #[test]
    fn test_reads_rows_with_default_timestamps() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prompts.db");

        // rows written by an older schema that relied on CURRENT_TIMESTAMP
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE cefr_levels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level_name TEXT UNIQUE NOT NULL,
                description TEXT
            );
            CREATE TABLE prompt_programs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                cefr_level_id INTEGER NOT NULL,
                prompt_template TEXT NOT NULL,
                tags TEXT,
                difficulty TEXT DEFAULT 'medium',
                version INTEGER DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (cefr_level_id) REFERENCES cefr_levels(id)
            );
            INSERT INTO cefr_levels (level_name, description) VALUES ('B1', 'Intermediate');
            INSERT INTO prompt_programs (name, description, cefr_level_id, prompt_template, tags)
                VALUES ('Airport Check-in', 'Travel', 1, 'Agent: {ChatHistory}', '[\"travel\"]');
            INSERT INTO prompt_programs
                (name, cefr_level_id, prompt_template, created_at, updated_at)
                VALUES ('Bakery', 1, 'Baker', '2024-05-01 09:30:00', '2024-05-02 10:00:00');",
        )
        .unwrap();
        drop(conn);

        let store = TemplateStore::open(&path).unwrap();
        let programs = store.list_programs_by_level("B1").unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].name, "Airport Check-in");
        assert_eq!(programs[0].tags, vec!["travel"]);
        assert_eq!(
            programs[1].created_at.to_rfc3339(),
            "2024-05-01T09:30:00+00:00"
        );
        assert_eq!(programs[1].version, 1);
        assert!(store.get_program("Bakery").unwrap().is_some());
        assert_eq!(store.list_all_programs().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let store = store_with_level("B1");

        let err = store
            .in_transaction(|tx| {
                tx.create_level("B2", "Upper Intermediate")?;
                tx.create_program(&NewProgram::new("Good", "B1", "ok"))?;
                tx.create_program(&NewProgram::new("Orphan", "Z9", "nope"))
            })
            .unwrap_err();

        assert!(matches!(err, DiscuteError::LevelNotFound(l) if l == "Z9"));
        assert_eq!(store.program_count().unwrap(), 0);
        assert_eq!(store.list_levels().unwrap(), vec!["B1"]);

        store
            .in_transaction(|tx| tx.create_program(&NewProgram::new("Good", "B1", "ok")))
            .unwrap();
        assert_eq!(store.program_count().unwrap(), 1);
    }
}
