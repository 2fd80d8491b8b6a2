//! The `quizgen show` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};

use quizgen_core::traits::QuestionStore;
use quizgen_providers::load_config_from;

pub fn execute(database: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = super::open_store(&config, database)?;

    let Some(questions) = store.load_all()? else {
        println!("No questions stored. Run `quizgen generate` first.");
        return Ok(());
    };

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Question", "Choices", "Translation", "Explanation"]);

    for (i, q) in questions.iter().enumerate() {
        let choices = q
            .choices
            .iter()
            .enumerate()
            .map(|(n, c)| {
                let marker = if n == q.correct_index { "*" } else { " " };
                format!("{marker}{}) {c}", n + 1)
            })
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            (i + 1).to_string(),
            q.prompt_text.clone(),
            choices,
            q.translation.clone(),
            q.explanation.clone(),
        ]);
    }

    println!("{table}");
    println!("{} questions stored (* marks the answer)", questions.len());
    Ok(())
}
