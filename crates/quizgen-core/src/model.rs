//! Core data model types for quizgen.
//!
//! A [`Question`] is a single-answer multiple-choice item; a [`QuestionSet`]
//! is the ordered batch produced by one generation cycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::QuestionError;

/// Number of choices every question carries.
pub const CHOICE_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// English sentence or gap-fill stem shown to the user.
    pub prompt_text: String,
    /// The four answer choices, in display order.
    pub choices: [String; CHOICE_COUNT],
    /// Index into `choices` of the correct answer (0-3).
    pub correct_index: usize,
    /// Japanese translation of `prompt_text`.
    pub translation: String,
    /// Japanese rationale for the correct choice.
    pub explanation: String,
}

impl Question {
    /// Build a question, rejecting it if any field constraint is violated.
    pub fn new(
        prompt_text: impl Into<String>,
        choices: [String; CHOICE_COUNT],
        correct_index: usize,
        translation: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            prompt_text: prompt_text.into(),
            choices,
            correct_index,
            translation: translation.into(),
            explanation: explanation.into(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Check every field constraint.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt_text.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        for (i, choice) in self.choices.iter().enumerate() {
            if choice.trim().is_empty() {
                return Err(QuestionError::EmptyChoice(i));
            }
        }
        for i in 0..CHOICE_COUNT {
            for j in (i + 1)..CHOICE_COUNT {
                if self.choices[i] == self.choices[j] {
                    return Err(QuestionError::DuplicateChoice(i, j));
                }
            }
        }
        if self.correct_index >= CHOICE_COUNT {
            return Err(QuestionError::AnswerOutOfRange(self.correct_index as i64));
        }
        if self.translation.trim().is_empty() {
            return Err(QuestionError::EmptyTranslation);
        }
        if self.explanation.trim().is_empty() {
            return Err(QuestionError::EmptyExplanation);
        }
        Ok(())
    }

    /// Text of the correct choice.
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.correct_index]
    }
}

/// An ordered batch of questions.
///
/// Construction does not require a non-empty batch; emptiness is rejected
/// where it matters (parsing, storing, starting a session).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self(questions)
    }
}

impl Deref for QuestionSet {
    type Target = [Question];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        Self(questions)
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// CEFR proficiency tier used to scale question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CefrLevel {
    A2,
    #[default]
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 5] = [
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Human-readable learner tier.
    pub fn label(&self) -> &'static str {
        match self {
            CefrLevel::A2 => "Beginner",
            CefrLevel::B1 => "Intermediate",
            CefrLevel::B2 => "Upper-intermediate",
            CefrLevel::C1 => "Advanced",
            CefrLevel::C2 => "Proficiency",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        };
        f.write_str(code)
    }
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        CefrLevel::ALL
            .into_iter()
            .find(|level| level.to_string() == code)
            .ok_or_else(|| {
                let expected = CefrLevel::ALL.map(|level| level.to_string()).join(", ");
                format!("unknown CEFR level: {code} (expected one of {expected})")
            })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A valid question whose choices are unique per `n`.
    pub fn question(n: usize, correct_index: usize) -> Question {
        Question::new(
            format!("Question {n}: She ___ to school every day."),
            [
                format!("go {n}"),
                format!("goes {n}"),
                format!("going {n}"),
                format!("gone {n}"),
            ],
            correct_index,
            format!("彼女は毎日学校に行きます。({n})"),
            "主語が三人称単数なので goes を使います。",
        )
        .unwrap()
    }

    pub fn set(len: usize) -> QuestionSet {
        QuestionSet::new((0..len).map(|n| question(n, n % CHOICE_COUNT)).collect())
    }
}
