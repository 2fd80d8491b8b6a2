//! Quiz session state machine.
//!
//! ```text
//! AwaitingStart -> QuestionDisplayed -> AnswerRecorded -> QuestionDisplayed ... -> Completed
//! ```
//!
//! A session shares the question set with whoever loaded it; answers are
//! recorded once per question and never overwritten.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{Question, QuestionSet, CHOICE_COUNT};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    AwaitingStart,
    QuestionDisplayed,
    AnswerRecorded,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A recorded answer for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub question_index: usize,
    pub chosen_index: usize,
    pub is_correct: bool,
}

/// What the player sees after answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_index: usize,
    pub translation: String,
    pub explanation: String,
}

/// Final tally of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
}

impl QuizResult {
    /// Score as a percentage of the total.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f64 * 100.0 / self.total as f64
        }
    }
}

const ACTIVE: &[SessionPhase] = &[SessionPhase::QuestionDisplayed, SessionPhase::AnswerRecorded];

/// One pass through a question set.
#[derive(Debug, Clone)]
pub struct Session {
    questions: Arc<QuestionSet>,
    current_index: usize,
    answers: Vec<RecordedAnswer>,
    phase: SessionPhase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session waiting for [`Session::start`].
    pub fn new() -> Self {
        Self {
            questions: Arc::new(QuestionSet::default()),
            current_index: 0,
            answers: Vec::new(),
            phase: SessionPhase::AwaitingStart,
        }
    }

    /// Begin a new pass over `questions` at index 0, discarding any previous
    /// progress. Accepted from every phase.
    pub fn start(&mut self, questions: Arc<QuestionSet>) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptySet);
        }
        self.questions = questions;
        self.current_index = 0;
        self.answers.clear();
        self.phase = SessionPhase::QuestionDisplayed;
        Ok(())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether questions are being served (not waiting and not finished).
    pub fn is_active(&self) -> bool {
        ACTIVE.contains(&self.phase)
    }

    /// Zero-based index of the current question and the set length.
    pub fn position(&self) -> (usize, usize) {
        (self.current_index, self.questions.len())
    }

    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    /// Count of correct answers recorded so far.
    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.expect_phase("current_question", ACTIVE)?;
        Ok(&self.questions[self.current_index])
    }

    pub fn submit_answer(&mut self, choice_index: usize) -> Result<AnswerFeedback, SessionError> {
        self.expect_phase("submit_answer", &[SessionPhase::QuestionDisplayed])?;
        if choice_index >= CHOICE_COUNT {
            return Err(SessionError::ChoiceOutOfRange(choice_index));
        }

        let question = &self.questions[self.current_index];
        let is_correct = choice_index == question.correct_index;
        let feedback = AnswerFeedback {
            is_correct,
            correct_index: question.correct_index,
            translation: question.translation.clone(),
            explanation: question.explanation.clone(),
        };

        self.answers.push(RecordedAnswer {
            question_index: self.current_index,
            chosen_index: choice_index,
            is_correct,
        });
        self.phase = SessionPhase::AnswerRecorded;
        Ok(feedback)
    }

    /// Move past an answered question. Returns `true` if another question
    /// is now displayed, `false` if the session is complete.
    pub fn advance(&mut self) -> Result<bool, SessionError> {
        self.expect_phase("advance", &[SessionPhase::AnswerRecorded])?;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.phase = SessionPhase::QuestionDisplayed;
            Ok(true)
        } else {
            self.phase = SessionPhase::Completed;
            Ok(false)
        }
    }

    pub fn result(&self) -> Result<QuizResult, SessionError> {
        self.expect_phase("result", &[SessionPhase::Completed])?;
        Ok(QuizResult {
            score: self.score(),
            total: self.questions.len(),
        })
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        expected: &'static [SessionPhase],
    ) -> Result<(), SessionError> {
        if expected.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                expected,
                actual: self.phase,
            })
        }
    }
}
