//! Table definition.

use rusqlite::Connection;

/// One row per question; `id` doubles as the stable ordering key.
const CREATE_PROBLEMS: &str = "
CREATE TABLE IF NOT EXISTS problems (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL,
    option1 TEXT NOT NULL,
    option2 TEXT NOT NULL,
    option3 TEXT NOT NULL,
    option4 TEXT NOT NULL,
    answer INTEGER NOT NULL CHECK(answer >= 0 AND answer <= 3),
    translation TEXT NOT NULL,
    explanation TEXT NOT NULL,
    generated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);";

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_PROBLEMS)
}
