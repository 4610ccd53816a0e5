//! Migration domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named migration unit as reported by the migration runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub file: String,
}

impl MigrationRecord {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }
}

impl fmt::Display for MigrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file)
    }
}

/// Which migrations a `down` call should revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownSelector {
    /// Only the most recently executed migration.
    Last,
    /// Exactly the named migrations, in the given order.
    Migrations(Vec<String>),
    /// Every executed migration, newest first.
    All,
}

/// Migration status filter for listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    #[default]
    Pending,
    Executed,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "executed" => Ok(Self::Executed),
            other => Err(format!("invalid migration status: {other}")),
        }
    }
}

fn blame(failing: &Option<MigrationRecord>) -> String {
    failing
        .as_ref()
        .map(|m| format!(" (something wrong with {m})"))
        .unwrap_or_default()
}

/// Details of an apply batch that the runner rejected.
///
/// `failing` is a best-effort guess: the runner does not say which
/// migration aborted the batch, so the first pending migration that is not
/// recorded as executed is blamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("failed to apply migrations{}: {cause}", blame(.failing))]
pub struct BatchApplyFailure {
    pub failing: Option<MigrationRecord>,
    pub partially_applied: Vec<MigrationRecord>,
    pub reverted: Vec<MigrationRecord>,
    pub cause: String,
}

/// Outcome of an apply, revert or reset operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub success: bool,
    /// Migrations applied or reverted by the operation.
    pub migrations: Vec<MigrationRecord>,
    pub failure: Option<BatchApplyFailure>,
}

impl BatchResult {
    pub fn succeeded(migrations: Vec<MigrationRecord>) -> Self {
        Self {
            success: true,
            migrations,
            failure: None,
        }
    }

    pub fn failed(failure: BatchApplyFailure) -> Self {
        Self {
            success: false,
            migrations: Vec::new(),
            failure: Some(failure),
        }
    }
}
