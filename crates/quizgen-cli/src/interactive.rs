//! Terminal quiz loop.
//!
//! Generic over the reader and writer so it can be driven from tests.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};

use quizgen_core::model::CHOICE_COUNT;
use quizgen_core::session::{QuizResult, Session};

/// Play `session` from its current question to completion.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    out: &mut W,
) -> Result<QuizResult> {
    loop {
        let (index, total) = session.position();
        let question = session.current_question()?.clone();

        writeln!(out)?;
        writeln!(out, "Question {}/{}", index + 1, total)?;
        writeln!(out, "{}", question.prompt_text)?;
        for (i, choice) in question.choices.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, choice)?;
        }

        let choice = read_choice(input, out)?;
        let feedback = session.submit_answer(choice)?;

        if feedback.is_correct {
            writeln!(out, "正解！ (Correct!)")?;
        } else {
            writeln!(
                out,
                "残念！ (Incorrect!) The answer is {}) {}",
                feedback.correct_index + 1,
                question.choices[feedback.correct_index]
            )?;
        }
        writeln!(out, "訳: {}", feedback.translation)?;
        writeln!(out, "解説: {}", feedback.explanation)?;

        if !session.advance()? {
            break;
        }
        write!(out, "Press Enter for the next question...")?;
        out.flush()?;
        // EOF here just continues.
        input.read_line(&mut String::new())?;
    }

    let result = session.result()?;
    writeln!(out)?;
    writeln!(
        out,
        "Quiz finished! Your score: {} / {} ({:.0}%)",
        result.score,
        result.total,
        result.percentage()
    )?;
    Ok(result)
}

/// Prompt until the player enters a number between 1 and 4.
fn read_choice<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<usize> {
    loop {
        write!(out, "Your answer (1-{CHOICE_COUNT}): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before the quiz finished");
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=CHOICE_COUNT).contains(&n) => return Ok(n - 1),
            _ => writeln!(out, "Please enter a number from 1 to {CHOICE_COUNT}.")?,
        }
    }
}
