//! Shared test infrastructure for model and handler tests.
//!
//! # Test Database Setup
//! - `setup_test_db()` - temporary SQLite database with the schema applied
//! - `setup_test_pool()` - same, but wrapped in the app's r2d2 pool
#![allow(dead_code)]

use rusqlite::Connection;
use tempfile::TempDir;

use plenum::db::{self, DbPool, MIGRATIONS};
use plenum::models::form::{
    FormDraft, QUESTION_TYPE_MULTIPLE_CHOICE, QUESTION_TYPE_TEXT, QuestionDraft,
};
use plenum::models::meeting::{self, Meeting};

/// Setup a test database with the schema applied.
///
/// Returns a tuple of (TempDir, Connection) where TempDir must be kept
/// alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch(
        "PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;",
    )
    .expect("Failed to set pragmas");

    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Setup a test database behind the application's connection pool, for
/// tests that exercise handlers or concurrent access.
pub fn setup_test_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let pool = db::init_pool(db_path.to_str().expect("utf-8 temp path"));
    db::run_migrations(&pool);
    (dir, pool)
}

/// Create a meeting with a materialized pool and no linked forms.
pub fn create_meeting(conn: &Connection, name: &str, max_number: i64) -> Meeting {
    meeting::create_with_pool(conn, name, max_number, &[]).expect("Failed to create meeting")
}

pub fn text_question(text: &str, correct: Option<&str>) -> QuestionDraft {
    QuestionDraft {
        question_text: text.to_string(),
        question_type: QUESTION_TYPE_TEXT.to_string(),
        options: Vec::new(),
        correct: correct.map(str::to_string),
    }
}

pub fn choice_question(text: &str, options: &[&str], correct: Option<&str>) -> QuestionDraft {
    QuestionDraft {
        question_text: text.to_string(),
        question_type: QUESTION_TYPE_MULTIPLE_CHOICE.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct: correct.map(str::to_string),
    }
}

/// The quiz used across response tests: one ungraded text question and one
/// multiple-choice question with options Red/Blue where Red is correct.
pub fn sample_draft(name: &str) -> FormDraft {
    FormDraft {
        form_name: name.to_string(),
        questions: vec![
            text_question("How did you hear about the meeting?", None),
            choice_question("Pick a colour", &["Red", "Blue"], Some("Red")),
        ],
    }
}
