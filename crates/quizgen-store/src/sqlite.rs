//! SQLite-backed question store.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, error, info};

use quizgen_core::error::StoreError;
use quizgen_core::model::{Question, QuestionSet, CHOICE_COUNT};
use quizgen_core::traits::QuestionStore;

use crate::schema;

fn db_err(err: rusqlite::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

/// Question store backed by a single SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("opening question database at {:?}", path);

        let conn = Connection::open(path).map_err(|e| {
            error!("failed to open database at {:?}: {}", path, e);
            db_err(e)
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(db_err)?;

        schema::init(&conn).map_err(db_err)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        schema::init(&conn).map_err(db_err)?;
        Ok(Self { conn })
    }

    /// Number of stored questions.
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM problems", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count as usize)
    }
}

/// A row as stored, before validation.
struct StoredRow {
    id: i64,
    question: String,
    options: [String; CHOICE_COUNT],
    answer: i64,
    translation: String,
    explanation: String,
}

impl StoredRow {
    fn into_question(self) -> Result<Question, StoreError> {
        let row_id = self.id;
        let corrupt = |reason: String| StoreError::Corrupt { row_id, reason };
        let answer = usize::try_from(self.answer)
            .ok()
            .filter(|a| *a < CHOICE_COUNT)
            .ok_or_else(|| corrupt(format!("answer {} is out of range", self.answer)))?;
        Question::new(
            self.question,
            self.options,
            answer,
            self.translation,
            self.explanation,
        )
        .map_err(|e| corrupt(e.to_string()))
    }
}

impl QuestionStore for SqliteStore {
    fn replace(&mut self, questions: &QuestionSet) -> Result<(), StoreError> {
        if questions.is_empty() {
            return Err(StoreError::EmptySet);
        }
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|source| StoreError::InvalidQuestion { index, source })?;
        }

        // Uncommitted transactions roll back on drop, leaving the old set.
        let tx = self.conn.transaction().map_err(db_err)?;
        let removed = tx.execute("DELETE FROM problems", []).map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO problems
                        (question, option1, option2, option3, option4, answer, translation, explanation)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(db_err)?;
            for q in questions {
                stmt.execute(params![
                    q.prompt_text,
                    q.choices[0],
                    q.choices[1],
                    q.choices[2],
                    q.choices[3],
                    q.correct_index as i64,
                    q.translation,
                    q.explanation,
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        debug!(removed, inserted = questions.len(), "replaced stored question set");
        Ok(())
    }

    fn load_all(&self) -> Result<Option<QuestionSet>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, question, option1, option2, option3, option4, answer, translation, explanation
                 FROM problems ORDER BY id",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRow {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    options: [row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?],
                    answer: row.get(6)?,
                    translation: row.get(7)?,
                    explanation: row.get(8)?,
                })
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let questions = rows
            .into_iter()
            .map(StoredRow::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(QuestionSet::new(questions)))
    }
}
