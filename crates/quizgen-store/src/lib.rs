//! quizgen-store: SQLite persistence for the current question set.
//!
//! Implements the `QuestionStore` trait from `quizgen-core`. The database
//! holds exactly one question set; every successful generation replaces it
//! inside a single transaction.

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;
