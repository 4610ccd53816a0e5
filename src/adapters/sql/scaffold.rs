//! Migration file scaffolding for `migrations create`.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid migration name: {0:?}")]
    InvalidName(String),
    #[error("Migration file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("Failed to write migration file: {0}")]
    Io(#[from] std::io::Error),
}

/// File name for a new migration: `<YYYYMMDDHHMMSS>-<name>.sql`.
pub fn migration_file_name(name: &str, now: DateTime<Utc>) -> Result<String, ScaffoldError> {
    let name = name.trim();
    let name = name.strip_suffix(".sql").unwrap_or(name);
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(ScaffoldError::InvalidName(name.to_string()));
    }
    Ok(format!("{}-{name}.sql", now.format("%Y%m%d%H%M%S")))
}

fn template(name: &str, now: DateTime<Utc>) -> String {
    format!("-- Migration: {name}\n-- Created at: {}\n\n-- up\n\n\n-- down\n\n", now.to_rfc3339())
}

/// Write an empty migration into `dir`, creating the directory if needed.
pub async fn create_migration_file(dir: &Path, name: &str) -> Result<PathBuf, ScaffoldError> {
    let now = Utc::now();
    let file_name = migration_file_name(name, now)?;

    if !fs::try_exists(dir).await? {
        fs::create_dir_all(dir).await?;
        tracing::info!(path = %dir.display(), "created migrations directory");
    }

    let path = dir.join(&file_name);
    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(ScaffoldError::AlreadyExists(path));
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(template(name.trim(), now).as_bytes()).await?;
    file.flush().await?;

    Ok(path)
}
