//! The `quizgen play` command.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use quizgen_core::session::Session;
use quizgen_core::traits::QuestionStore;
use quizgen_providers::load_config_from;

use crate::interactive;

/// Replay the stored set. No provider credentials are needed.
pub fn execute(database: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = super::open_store(&config, database)?;

    let Some(questions) = store.load_all()? else {
        println!("No questions stored. Run `quizgen generate` first.");
        return Ok(());
    };
    tracing::info!(count = questions.len(), "loaded stored question set");

    let mut session = Session::new();
    session.start(Arc::new(questions))?;

    let stdin = io::stdin();
    interactive::run(&mut session, &mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}
