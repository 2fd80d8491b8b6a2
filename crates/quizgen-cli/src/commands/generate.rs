//! The `quizgen generate` command.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizgen_core::engine::{EngineConfig, QuizEngine};
use quizgen_core::model::CefrLevel;
use quizgen_providers::{create_provider, load_config_from};

use crate::interactive;

pub async fn execute(
    level: CefrLevel,
    hint: Option<String>,
    no_play: bool,
    database: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    // Credentials are checked before anything is opened or sent.
    let provider_config = config.provider_from_env()?;
    let provider = create_provider(&provider_config, config.timeout_secs)
        .with_context(|| format!("failed to create {} provider", provider_config.kind()))?;
    let store = super::open_store(&config, database)?;

    let mut engine = QuizEngine::new(
        Arc::new(provider),
        Box::new(store),
        EngineConfig {
            question_count: config.question_count,
        },
    );

    eprintln!(
        "Provider: {} | Model: {}",
        engine.provider().name(),
        engine.provider().default_model()
    );
    eprintln!(
        "Generating {} questions at CEFR {level} ({})...",
        config.question_count,
        level.label()
    );

    let questions = engine
        .request_generation(level, hint.as_deref())
        .await
        .context("question generation failed")?;
    println!("{} new questions saved.", questions.len());

    if no_play {
        return Ok(());
    }

    let stdin = io::stdin();
    interactive::run(engine.session_mut(), &mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}
