//! Migration files on disk.
//!
//! A migration is a single `.sql` file named `<timestamp>-<name>.sql` with
//! an `-- up` section and an optional `-- down` section:
//!
//! ```sql
//! -- up
//! CREATE TABLE users (id INTEGER PRIMARY KEY);
//!
//! -- down
//! DROP TABLE users;
//! ```
//!
//! The file name identifies the migration and its sort order is the apply
//! order.

use std::path::PathBuf;
use tokio::fs;

use crate::domain::errors::RunnerError;

const UP_MARKER: &str = "-- up";
const DOWN_MARKER: &str = "-- down";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub file: String,
    pub up_sql: String,
    pub down_sql: String,
}

/// Directory holding the migration files.
#[derive(Debug, Clone)]
pub struct MigrationSource {
    dir: PathBuf,
}

impl MigrationSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load every migration, sorted by file name.
    ///
    /// A directory that does not exist holds no migrations.
    pub async fn load(&self) -> Result<Vec<MigrationFile>, RunnerError> {
        if !fs::try_exists(&self.dir).await? {
            tracing::warn!(path = %self.dir.display(), "migrations directory does not exist");
            return Ok(Vec::new());
        }

        let mut migrations = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("sql")
            {
                continue;
            }

            let file = entry.file_name().to_string_lossy().to_string();
            let content = fs::read_to_string(&path).await?;
            migrations.push(parse_migration(&file, &content)?);
        }

        migrations.sort_by(|a, b| a.file.cmp(&b.file));
        Ok(migrations)
    }
}

/// Split a migration file into its up and down statements.
pub fn parse_migration(file: &str, content: &str) -> Result<MigrationFile, RunnerError> {
    #[derive(PartialEq)]
    enum Section {
        Header,
        Up,
        Down,
    }

    let mut section = Section::Header;
    let mut seen_up = false;
    let mut up = Vec::new();
    let mut down = Vec::new();

    for line in content.lines() {
        let marker = line.trim().to_ascii_lowercase();
        if marker == UP_MARKER {
            if seen_up {
                return Err(invalid(file, "duplicate `-- up` marker"));
            }
            seen_up = true;
            section = Section::Up;
            continue;
        }
        if marker == DOWN_MARKER {
            if section == Section::Down {
                return Err(invalid(file, "duplicate `-- down` marker"));
            }
            section = Section::Down;
            continue;
        }

        match section {
            Section::Header => {}
            Section::Up => up.push(line),
            Section::Down => down.push(line),
        }
    }

    if !seen_up {
        return Err(invalid(file, "missing `-- up` marker"));
    }

    Ok(MigrationFile {
        file: file.to_string(),
        up_sql: up.join("\n").trim().to_string(),
        down_sql: down.join("\n").trim().to_string(),
    })
}

fn invalid(file: &str, reason: &str) -> RunnerError {
    RunnerError::InvalidMigrationFile {
        path: file.to_string(),
        reason: reason.to_string(),
    }
}
