//! Strict decoder for raw model output.
//!
//! Accepts the JSON array described by [`crate::prompt`], optionally wrapped
//! in a markdown code fence. Every record must validate or the whole batch
//! is rejected.

use serde_json::{Map, Value};

use crate::error::{ParseError, QuestionError};
use crate::model::{Question, QuestionSet, CHOICE_COUNT};

/// Parse and validate raw model output into a non-empty [`QuestionSet`].
pub fn parse_response(raw: &str) -> Result<QuestionSet, ParseError> {
    let body = strip_code_fence(raw).replace(['\r', '\n'], " ");

    let value: Value =
        serde_json::from_str(body.trim()).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ParseError::NotAnArray);
    };
    if items.is_empty() {
        return Err(ParseError::NoQuestions);
    }

    let questions = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_question(item).map_err(|source| ParseError::InvalidQuestion { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = questions.len(), "parsed question batch");
    Ok(QuestionSet::new(questions))
}

fn parse_question(item: &Value) -> Result<Question, QuestionError> {
    let Value::Object(fields) = item else {
        return Err(QuestionError::WrongType {
            field: "question object",
            expected: "an object",
        });
    };

    let prompt_text = text_field(fields, "question")?;

    let options = match fields.get("options") {
        Some(Value::Array(options)) => options,
        Some(_) => {
            return Err(QuestionError::WrongType {
                field: "options",
                expected: "an array of strings",
            })
        }
        None => return Err(QuestionError::MissingField("options")),
    };
    if options.len() != CHOICE_COUNT {
        return Err(QuestionError::ChoiceCount(options.len()));
    }
    let mut choices: [String; CHOICE_COUNT] = Default::default();
    for (slot, option) in choices.iter_mut().zip(options) {
        let Value::String(text) = option else {
            return Err(QuestionError::WrongType {
                field: "options",
                expected: "an array of strings",
            });
        };
        *slot = normalize(text);
    }

    let answer = match fields.get("answer") {
        Some(value) => value.as_i64().ok_or(QuestionError::WrongType {
            field: "answer",
            expected: "an integer",
        })?,
        None => return Err(QuestionError::MissingField("answer")),
    };
    if !(1..=CHOICE_COUNT as i64).contains(&answer) {
        return Err(QuestionError::AnswerOutOfRange(answer));
    }

    let translation = text_field(fields, "translation")?;
    let explanation = text_field(fields, "explanation")?;

    Question::new(
        prompt_text,
        choices,
        (answer - 1) as usize,
        translation,
        explanation,
    )
}

fn text_field(fields: &Map<String, Value>, name: &'static str) -> Result<String, QuestionError> {
    match fields.get(name) {
        Some(Value::String(text)) => Ok(normalize(text)),
        Some(_) => Err(QuestionError::WrongType {
            field: name,
            expected: "a string",
        }),
        None => Err(QuestionError::MissingField(name)),
    }
}

/// Trim and collapse runs of ASCII whitespace into a single space.
/// Full-width spaces in Japanese text are kept as written.
fn normalize(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a surrounding ```` ```json ```` / ```` ``` ```` fence if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(question: &str, options: &[&str], answer: i64) -> Value {
        serde_json::json!({
            "question": question,
            "options": options,
            "answer": answer,
            "translation": "彼女は毎日学校に行きます。",
            "explanation": "三人称単数現在なので goes を使います。"
        })
    }

    fn batch(items: Vec<Value>) -> String {
        Value::Array(items).to_string()
    }

    #[test]
    fn parses_valid_batch() {
        let raw = batch(vec![
            item("She ___ to school.", &["go", "goes", "going", "gone"], 2),
            item("They ___ tennis.", &["play", "plays", "played", "playing"], 1),
        ]);
        let set = parse_response(&raw).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].correct_index, 1);
        assert_eq!(set[0].correct_choice(), "goes");
        assert_eq!(set[1].correct_index, 0);
        for q in &set {
            q.validate().unwrap();
        }
    }

    #[test]
    fn strips_markdown_fence() {
        let raw = format!(
            "```json\n{}\n```",
            batch(vec![item("A ___ B", &["a", "b", "c", "d"], 4)])
        );
        let set = parse_response(&raw).unwrap();
        assert_eq!(set[0].correct_index, 3);
    }

    #[test]
    fn tolerates_raw_newlines_inside_strings() {
        let raw = "[{\"question\": \"She ___\nhome.\", \"options\": [\"go\", \"goes\", \"went\", \"gone\"], \
\"answer\": 3, \"translation\": \"彼女は\n帰った。\", \"explanation\": \"過去形です。\"}]";
        let set = parse_response(raw).unwrap();
        assert_eq!(set[0].prompt_text, "She ___ home.");
        assert_eq!(set[0].translation, "彼女は 帰った。");
    }

    #[test]
    fn normalizes_whitespace() {
        let raw = batch(vec![item(
            "  I   ___ here.  ",
            &[" am ", "is", "are", "be"],
            1,
        )]);
        let set = parse_response(&raw).unwrap();
        assert_eq!(set[0].prompt_text, "I ___ here.");
        assert_eq!(set[0].choices[0], "am");
    }

    #[test]
    fn keeps_full_width_spaces() {
        let mut record = item("She is a ___.", &["student", "students", "studying", "studied"], 1);
        record["translation"] = Value::String("彼女は\u{3000}学生です。".into());
        let set = parse_response(&batch(vec![record])).unwrap();
        assert_eq!(set[0].translation, "彼女は\u{3000}学生です。");
    }

    #[test]
    fn one_bad_record_rejects_batch() {
        let mut bad = item("They ___ tennis.", &["play", "plays", "played", "playing"], 1);
        bad.as_object_mut().unwrap().remove("translation");
        let raw = batch(vec![
            item("She ___ to school.", &["go", "goes", "going", "gone"], 2),
            bad,
        ]);
        let err = parse_response(&raw).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidQuestion {
                index: 1,
                source: QuestionError::MissingField("translation")
            }
        ));
    }

    #[test]
    fn rejects_wrong_choice_count() {
        let raw = batch(vec![item("x ___", &["a", "b", "c"], 1)]);
        assert!(matches!(
            parse_response(&raw).unwrap_err(),
            ParseError::InvalidQuestion {
                source: QuestionError::ChoiceCount(3),
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicate_choices_after_normalizing() {
        let raw = batch(vec![item("x ___", &["a", "b", " a ", "c"], 1)]);
        assert!(matches!(
            parse_response(&raw).unwrap_err(),
            ParseError::InvalidQuestion {
                source: QuestionError::DuplicateChoice(0, 2),
                ..
            }
        ));
    }

    #[test]
    fn rejects_answer_out_of_range() {
        for answer in [0, 5, -1] {
            let raw = batch(vec![item("x ___", &["a", "b", "c", "d"], answer)]);
            assert!(matches!(
                parse_response(&raw).unwrap_err(),
                ParseError::InvalidQuestion {
                    source: QuestionError::AnswerOutOfRange(_),
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_string_answer() {
        let mut q = item("x ___", &["a", "b", "c", "d"], 1);
        q["answer"] = Value::String("1".into());
        assert!(matches!(
            parse_response(&batch(vec![q])).unwrap_err(),
            ParseError::InvalidQuestion {
                source: QuestionError::WrongType { field: "answer", .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_and_non_array() {
        assert!(matches!(parse_response("[]"), Err(ParseError::NoQuestions)));
        assert!(matches!(
            parse_response("{\"question\": \"x\"}"),
            Err(ParseError::NotAnArray)
        ));
        assert!(matches!(
            parse_response("Sure! Here are your questions."),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn fence_without_language_tag() {
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```json [1] ```"), "[1]");
        assert_eq!(strip_code_fence("[1]"), "[1]");
    }
}
