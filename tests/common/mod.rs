//! Common test utilities for integration tests
//!
//! Provides scriptable fakes for the runner and connection ports plus
//! helpers for building migration directories.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use deploy_migrations::domain::errors::{DomainResult, RunnerError};
use deploy_migrations::domain::models::{DownSelector, MigrationRecord};
use deploy_migrations::domain::ports::{ConnectionClient, MigrationRunner};
use deploy_migrations::services::MigrationController;

pub fn records(files: &[&str]) -> Vec<MigrationRecord> {
    files.iter().map(|f| MigrationRecord::new(*f)).collect()
}

fn failure(message: &str) -> deploy_migrations::DomainError {
    RunnerError::Database(message.to_string()).into()
}

/// Runner fake with fixed state and optional failures per operation.
///
/// `executed` is what the runner reports after any `up` attempt.
#[derive(Default)]
pub struct FakeRunner {
    pub pending: Vec<MigrationRecord>,
    pub executed: Vec<MigrationRecord>,
    pub up_error: Option<String>,
    pub executed_error: Option<String>,
    pub down_error: Option<String>,
    pub calls: Mutex<Vec<&'static str>>,
    pub down_calls: Mutex<Vec<DownSelector>>,
}

impl FakeRunner {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn down_calls(&self) -> Vec<DownSelector> {
        self.down_calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MigrationRunner for FakeRunner {
    async fn pending(&self) -> DomainResult<Vec<MigrationRecord>> {
        self.record("pending");
        Ok(self.pending.clone())
    }

    async fn executed(&self) -> DomainResult<Vec<MigrationRecord>> {
        self.record("executed");
        match &self.executed_error {
            Some(message) => Err(failure(message)),
            None => Ok(self.executed.clone()),
        }
    }

    async fn up(&self) -> DomainResult<Vec<MigrationRecord>> {
        self.record("up");
        match &self.up_error {
            Some(message) => Err(failure(message)),
            None => Ok(self.pending.clone()),
        }
    }

    async fn down(&self, selector: DownSelector) -> DomainResult<Vec<MigrationRecord>> {
        self.record("down");
        self.down_calls.lock().unwrap().push(selector.clone());
        if let Some(message) = &self.down_error {
            return Err(failure(message));
        }

        Ok(match selector {
            DownSelector::Migrations(names) => names.into_iter().map(MigrationRecord::new).collect(),
            DownSelector::Last => self.executed.last().cloned().into_iter().collect(),
            DownSelector::All => self.executed.iter().rev().cloned().collect(),
        })
    }
}

/// Connection fake counting `close` calls.
#[derive(Default)]
pub struct FakeClient {
    pub fail_close: bool,
    closes: AtomicUsize,
}

impl FakeClient {
    pub fn failing() -> Self {
        Self {
            fail_close: true,
            ..Default::default()
        }
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionClient for FakeClient {
    async fn close(&self) -> DomainResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(RunnerError::Connection("close failed".to_string()).into());
        }
        Ok(())
    }
}

pub struct Harness {
    pub runner: Arc<FakeRunner>,
    pub client: Arc<FakeClient>,
}

impl Harness {
    pub fn new(runner: FakeRunner) -> Self {
        Self::with_client(runner, FakeClient::default())
    }

    pub fn with_client(runner: FakeRunner, client: FakeClient) -> Self {
        Self {
            runner: Arc::new(runner),
            client: Arc::new(client),
        }
    }

    pub fn controller(&self) -> MigrationController<FakeRunner, FakeClient> {
        MigrationController::new(self.runner.clone(), self.client.clone())
    }
}

/// Write a migration file with the given sections.
pub fn write_migration(dir: &Path, file: &str, up: &str, down: &str) {
    std::fs::write(dir.join(file), format!("-- up\n{up}\n\n-- down\n{down}\n"))
        .expect("Failed to write migration file");
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Create a temporary directory for test isolation
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}
