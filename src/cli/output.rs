//! Output formatting utilities for the CLI.

use console::style;
use serde::Serialize;

use crate::domain::models::MigrationRecord;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        let human = result.to_human();
        if !human.is_empty() {
            println!("{human}");
        }
    }
}

/// `=> <file>` line for a migration touched or listed by a command.
pub fn file_line(file: &str) -> String {
    style(format!("=> {file}")).green().to_string()
}

/// `=> reverted <file>` line for a migration rolled back after a failure.
pub fn reverted_line(file: &str) -> String {
    style(format!("=> reverted {file}")).yellow().to_string()
}

pub fn file_names(migrations: &[MigrationRecord]) -> Vec<String> {
    migrations.iter().map(|m| m.file.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_carry_file_name() {
        assert!(file_line("001-init.sql").contains("=> 001-init.sql"));
        assert!(reverted_line("001-init.sql").contains("=> reverted 001-init.sql"));
    }

    #[test]
    fn test_file_names_keep_order() {
        let records = vec![MigrationRecord::new("b.sql"), MigrationRecord::new("a.sql")];
        assert_eq!(file_names(&records), vec!["b.sql", "a.sql"]);
    }
}
