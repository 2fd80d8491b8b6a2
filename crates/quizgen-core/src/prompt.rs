//! Prompt construction.
//!
//! The output schema described here is the contract the response parser
//! enforces: a bare JSON array of objects with `question`, `options`,
//! `answer` (1-based), `translation` and `explanation` keys.

use crate::model::CefrLevel;

/// Default number of questions requested per generation.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// System message sent alongside every generation prompt.
pub const SYSTEM_PROMPT: &str =
    "You are an AI assistant that generates English multiple-choice questions in JSON format.";

/// Builds generation prompts for a fixed question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBuilder {
    question_count: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTION_COUNT)
    }
}

impl PromptBuilder {
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count: question_count.max(1),
        }
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Build the instruction prompt for `level`, appending `hint` verbatim
    /// when it has any non-whitespace content.
    pub fn build(&self, level: CefrLevel, hint: Option<&str>) -> String {
        let count = self.question_count;
        let mut prompt = format!(
            "Generate {count} multiple-choice English grammar and sentence completion \
questions suitable for English learners at CEFR {level} level ({label}). \
Focus on common grammar points such as tenses, phrasal verbs, prepositions, \
articles, and sentence structure.\n\n",
            label = level.label(),
        );

        if let Some(hint) = hint.filter(|h| !h.trim().is_empty()) {
            prompt.push_str("Additionally, consider the following request for the questions: ");
            prompt.push_str(hint);
            prompt.push_str("\n\n");
        }

        prompt.push_str(
            "Provide the output strictly as a JSON array of objects. Each object must have \
the following keys:\n\
- \"question\": the question text (string). For sentence completion, use \"___\" to mark the blank.\n\
- \"options\": an array of exactly 4 distinct strings.\n\
- \"answer\": the index (starting from 1) of the correct option in \"options\" (integer 1-4).\n\
- \"translation\": a Japanese translation of the question sentence (string). 日本語で記述してください。\n\
- \"explanation\": a brief explanation of why the answer is correct (string). 解説は日本語で記述してください。\n\n\
Example format for one question object:\n\
{\n\
  \"question\": \"She ___ watching TV when I arrived.\",\n\
  \"options\": [\"is\", \"was\", \"be\", \"are\"],\n\
  \"answer\": 2,\n\
  \"translation\": \"私が到着したとき、彼女はテレビを見ていました。\",\n\
  \"explanation\": \"別の過去の動作が起きたときに進行中だった動作なので、過去進行形 'was watching' を使います。\"\n\
}\n\n",
        );

        prompt.push_str(&format!(
            "Ensure you provide exactly {count} distinct question objects in the JSON array. \
Output only the raw JSON array, with no introductory text, code block formatting, or closing text."
        ));

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_level_and_hint() {
        let prompt = PromptBuilder::default().build(CefrLevel::B2, Some("phrasal verbs"));
        assert!(prompt.contains("CEFR B2"));
        assert!(prompt.contains("phrasal verbs"));
        assert!(prompt.contains("exactly 10 distinct"));
    }

    #[test]
    fn blank_hint_is_ignored() {
        let builder = PromptBuilder::new(5);
        let without = builder.build(CefrLevel::A2, None);
        let blank = builder.build(CefrLevel::A2, Some("   "));
        assert_eq!(without, blank);
        assert!(!without.contains("Additionally"));
    }

    #[test]
    fn deterministic() {
        let builder = PromptBuilder::new(3);
        assert_eq!(
            builder.build(CefrLevel::C2, Some("idioms")),
            builder.build(CefrLevel::C2, Some("idioms"))
        );
    }

    #[test]
    fn describes_every_schema_key() {
        let prompt = PromptBuilder::default().build(CefrLevel::B1, None);
        for key in ["\"question\"", "\"options\"", "\"answer\"", "\"translation\"", "\"explanation\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }

    #[test]
    fn zero_count_is_clamped() {
        assert_eq!(PromptBuilder::new(0).question_count(), 1);
    }
}
