use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{Connection, params};

use crate::errors::AppError;
use crate::models::form;

use super::types::*;

/// Ids of forms this participant has already answered.
pub fn answered_form_ids(
    conn: &Connection,
    participant_id: &str,
) -> Result<Vec<i64>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT form_id FROM responses WHERE participant_id = ?1 ORDER BY form_id",
    )?;
    let rows = stmt.query_map(params![participant_id], |row| row.get(0))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

pub fn has_submitted(
    conn: &Connection,
    form_id: i64,
    participant_id: &str,
) -> Result<bool, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM responses WHERE form_id = ?1 AND participant_id = ?2",
        params![form_id, participant_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Record a participant's answers for a form, one row per question.
///
/// Preconditions checked here: no prior submission for this (participant,
/// form) pair, and a non-empty answer for every question — all questions
/// are mandatory, there is no partial submission. The caller is responsible
/// for having resolved the participant's assigned number (`Unauthorized`
/// belongs to that step).
///
/// The writes are independent inserts, not an atomic batch. A failure after
/// the first row reports how many answers actually landed
/// (`SubmitIncomplete`), distinctly from a total failure.
pub fn submit(
    conn: &Connection,
    form_id: i64,
    participant_id: &str,
    answers: &HashMap<i64, String>,
) -> Result<usize, AppError> {
    let questions = form::find_questions(conn, form_id)?;
    if questions.is_empty() {
        return Err(AppError::Validation(
            "This form has no questions".to_string(),
        ));
    }

    if has_submitted(conn, form_id, participant_id)? {
        return Err(AppError::AlreadySubmitted);
    }

    for q in &questions {
        match answers.get(&q.question.id) {
            Some(answer) if !answer.trim().is_empty() => {}
            _ => {
                return Err(AppError::Validation(
                    "All questions must be answered".to_string(),
                ));
            }
        }
    }
    let known: Vec<i64> = questions.iter().map(|q| q.question.id).collect();
    if answers.keys().any(|id| !known.contains(id)) {
        return Err(AppError::Validation(
            "Answer given for a question that is not part of this form".to_string(),
        ));
    }

    let submitted_at = Utc::now().to_rfc3339();
    let total = questions.len();
    let mut committed = 0usize;
    for q in &questions {
        let answer = &answers[&q.question.id];
        let result = conn.execute(
            "INSERT INTO responses (form_id, participant_id, question_id, answer, submitted_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![form_id, participant_id, q.question.id, answer, submitted_at],
        );
        match result {
            Ok(_) => committed += 1,
            Err(e) if committed == 0 => return Err(e.into()),
            Err(e) => {
                log::error!(
                    "Response insert failed after {committed}/{total} rows for form {form_id}: {e}"
                );
                return Err(AppError::SubmitIncomplete { committed, total });
            }
        }
    }
    Ok(committed)
}

/// Raw response rows for one form, oldest first.
pub fn list_for_form(conn: &Connection, form_id: i64) -> Result<Vec<ResponseRow>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, form_id, participant_id, question_id, answer, submitted_at \
         FROM responses WHERE form_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![form_id], |row| {
        Ok(ResponseRow {
            id: row.get("id")?,
            form_id: row.get("form_id")?,
            participant_id: row.get("participant_id")?,
            question_id: row.get("question_id")?,
            answer: row.get("answer")?,
            submitted_at: row.get("submitted_at")?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}
