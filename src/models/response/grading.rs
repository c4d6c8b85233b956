//! Grading of recorded answers for the statistics and export views.

use rusqlite::{Connection, params};

use crate::errors::AppError;
use crate::models::form::QUESTION_TYPE_MULTIPLE_CHOICE;

use super::types::GradedResponse;

pub const VERDICT_CORRECT: &str = "Correta";
pub const VERDICT_INCORRECT: &str = "Incorreta";
pub const VERDICT_UNGRADED: &str = "N/A";

/// Grade one stored answer against the question's configured correct answer.
///
/// Multiple choice compares option ids verbatim; text compares
/// case-insensitively. Questions without a correct answer are ungraded.
pub fn grade_answer(
    question_type: &str,
    correct_answer: Option<&str>,
    answer: &str,
) -> &'static str {
    match correct_answer {
        None => VERDICT_UNGRADED,
        Some(correct) if question_type == QUESTION_TYPE_MULTIPLE_CHOICE => {
            if answer == correct {
                VERDICT_CORRECT
            } else {
                VERDICT_INCORRECT
            }
        }
        Some(correct) => {
            if answer.trim().eq_ignore_ascii_case(correct.trim()) {
                VERDICT_CORRECT
            } else {
                VERDICT_INCORRECT
            }
        }
    }
}

const GRADED_SELECT: &str = "\
SELECT r.participant_id, f.form_name, q.question_text, q.question_type, \
       q.correct_answer, r.answer, qo.option_text \
FROM responses r \
JOIN forms f ON f.id = r.form_id \
JOIN questions q ON q.id = r.question_id \
LEFT JOIN question_options qo \
    ON q.question_type = 'multiple_choice' \
   AND qo.id = CAST(r.answer AS INTEGER)";

fn map_graded_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GradedResponse> {
    let question_type: String = row.get("question_type")?;
    let correct_answer: Option<String> = row.get("correct_answer")?;
    let answer: String = row.get("answer")?;
    let option_text: Option<String> = row.get("option_text")?;

    let verdict = grade_answer(&question_type, correct_answer.as_deref(), &answer).to_string();
    // Multiple-choice answers are stored as option ids; show the option text
    // when the option still exists.
    let answer_display = option_text.unwrap_or(answer);

    Ok(GradedResponse {
        participant_id: row.get("participant_id")?,
        form_name: row.get("form_name")?,
        question_text: row.get("question_text")?,
        answer_display,
        verdict,
    })
}

/// Graded answers for every form linked to a meeting.
/// Empty list when nothing has been submitted yet.
pub fn graded_for_meeting(
    conn: &Connection,
    meeting_id: i64,
) -> Result<Vec<GradedResponse>, AppError> {
    let sql = format!(
        "{GRADED_SELECT} \
         JOIN meeting_forms mf ON mf.form_id = r.form_id AND mf.meeting_id = ?1 \
         ORDER BY r.participant_id, r.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![meeting_id], map_graded_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Graded answers for a single form.
pub fn graded_for_form(conn: &Connection, form_id: i64) -> Result<Vec<GradedResponse>, AppError> {
    let sql = format!(
        "{GRADED_SELECT} \
         WHERE r.form_id = ?1 \
         ORDER BY r.participant_id, r.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![form_id], map_graded_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}
