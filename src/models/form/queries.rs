use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::AppError;

use super::types::*;

/// Derive the unique form identifier, e.g. `form_1700000000_exit_survey`.
pub fn make_slug(form_name: &str) -> String {
    format!("form_{}_{}", Utc::now().timestamp(), slugify(form_name))
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn validate_draft(draft: &FormDraft) -> Result<(), AppError> {
    if draft.form_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Form name must not be empty".to_string(),
        ));
    }
    if draft.questions.is_empty() {
        return Err(AppError::Validation(
            "A form needs at least one question".to_string(),
        ));
    }
    for (i, q) in draft.questions.iter().enumerate() {
        let position = i + 1;
        if q.question_text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Question {position} has no text"
            )));
        }
        match q.question_type.as_str() {
            QUESTION_TYPE_TEXT => {
                if !q.options.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Question {position} is a text question and cannot have options"
                    )));
                }
            }
            QUESTION_TYPE_MULTIPLE_CHOICE => {
                if q.options.len() < 2 {
                    return Err(AppError::Validation(format!(
                        "Question {position} needs at least two options"
                    )));
                }
                if q.options.iter().any(|o| o.trim().is_empty()) {
                    return Err(AppError::Validation(format!(
                        "Question {position} has an empty option"
                    )));
                }
                if let Some(correct) = &q.correct {
                    if !q.options.contains(correct) {
                        return Err(AppError::Validation(format!(
                            "Question {position}: correct option is not among the options"
                        )));
                    }
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "Question {position} has unknown type '{other}'"
                )));
            }
        }
    }
    Ok(())
}

/// Persist an authored draft as a new form with its questions and options.
///
/// For a multiple-choice question the authored correct option arrives as
/// text; once its option row exists the question's `correct_answer` is
/// rewritten to that option's id, which is also how answers are stored.
pub fn create(conn: &Connection, draft: &FormDraft) -> Result<Form, AppError> {
    validate_draft(draft)?;

    let form_name = draft.form_name.trim();
    let slug = make_slug(form_name);
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO forms (slug, form_name, created_at) VALUES (?1, ?2, ?3)",
        params![slug, form_name, created_at],
    )?;
    let form_id = conn.last_insert_rowid();

    for q in &draft.questions {
        let text_correct = if q.question_type == QUESTION_TYPE_TEXT {
            q.correct.as_deref()
        } else {
            None
        };
        conn.execute(
            "INSERT INTO questions (form_id, question_text, question_type, correct_answer) \
             VALUES (?1, ?2, ?3, ?4)",
            params![form_id, q.question_text.trim(), q.question_type, text_correct],
        )?;
        let question_id = conn.last_insert_rowid();

        for option_text in &q.options {
            conn.execute(
                "INSERT INTO question_options (question_id, option_text) VALUES (?1, ?2)",
                params![question_id, option_text],
            )?;
            if q.correct.as_deref() == Some(option_text.as_str()) {
                let option_id = conn.last_insert_rowid();
                conn.execute(
                    "UPDATE questions SET correct_answer = ?1 WHERE id = ?2",
                    params![option_id.to_string(), question_id],
                )?;
            }
        }
    }

    Ok(Form {
        id: form_id,
        slug,
        form_name: form_name.to_string(),
        created_at,
    })
}

fn map_form_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Form> {
    Ok(Form {
        id: row.get("id")?,
        slug: row.get("slug")?,
        form_name: row.get("form_name")?,
        created_at: row.get("created_at")?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Form>, AppError> {
    conn.query_row(
        "SELECT id, slug, form_name, created_at FROM forms WHERE id = ?1",
        params![id],
        map_form_row,
    )
    .optional()
    .map_err(Into::into)
}

pub fn find_by_slug(conn: &Connection, slug: &str) -> Result<Option<Form>, AppError> {
    conn.query_row(
        "SELECT id, slug, form_name, created_at FROM forms WHERE slug = ?1",
        params![slug],
        map_form_row,
    )
    .optional()
    .map_err(Into::into)
}

/// All forms, newest first. Empty list when none exist.
pub fn list_all(conn: &Connection) -> Result<Vec<Form>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, slug, form_name, created_at FROM forms \
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], map_form_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Forms linked to a meeting. Empty list when the meeting has none (or does
/// not exist) — only a failing query is an error.
pub fn forms_for_meeting(conn: &Connection, meeting_id: i64) -> Result<Vec<Form>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT f.id, f.slug, f.form_name, f.created_at \
         FROM forms f \
         JOIN meeting_forms mf ON mf.form_id = f.id \
         WHERE mf.meeting_id = ?1 \
         ORDER BY f.created_at DESC, f.id DESC",
    )?;
    let rows = stmt.query_map(params![meeting_id], map_form_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// A form's questions in authoring order, each with its options.
pub fn find_questions(conn: &Connection, form_id: i64) -> Result<Vec<QuestionWithOptions>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, form_id, question_text, question_type, correct_answer \
         FROM questions WHERE form_id = ?1 ORDER BY id",
    )?;
    let questions = stmt
        .query_map(params![form_id], |row| {
            Ok(Question {
                id: row.get("id")?,
                form_id: row.get("form_id")?,
                question_text: row.get("question_text")?,
                question_type: row.get("question_type")?,
                correct_answer: row.get("correct_answer")?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut detailed = Vec::with_capacity(questions.len());
    for question in questions {
        let options = find_options(conn, question.id)?;
        detailed.push(QuestionWithOptions { question, options });
    }
    Ok(detailed)
}

pub fn find_options(conn: &Connection, question_id: i64) -> Result<Vec<QuestionOption>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, option_text FROM question_options WHERE question_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![question_id], |row| {
        Ok(QuestionOption {
            id: row.get("id")?,
            option_text: row.get("option_text")?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}
