//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgen_providers::QuizgenConfig;
use quizgen_store::SqliteStore;

pub mod generate;
pub mod play;
pub mod show;

/// Open the configured database, honouring a `--database` override.
fn open_store(config: &QuizgenConfig, database: Option<PathBuf>) -> Result<SqliteStore> {
    let path = database.unwrap_or_else(|| config.database_path.clone());
    SqliteStore::open(&path)
        .with_context(|| format!("could not open database {}", path.display()))
}
