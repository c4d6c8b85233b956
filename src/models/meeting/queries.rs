use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::AppError;

use super::types::*;

/// Slot rows are materialized in multi-row inserts of this size.
/// Performance detail, not a correctness constraint.
const SLOT_INSERT_BATCH: usize = 100;

/// Largest pool a single meeting may hold.
pub const MAX_POOL_SIZE: i64 = 10_000;

/// Derive the pool identifier from the meeting name, e.g.
/// `meeting_1700000000_weekly_standup`. The timestamp prefix keeps slugs
/// unique across meetings that share a name.
pub fn make_slug(meeting_name: &str) -> String {
    format!(
        "meeting_{}_{}",
        Utc::now().timestamp(),
        slugify(meeting_name)
    )
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Create a meeting and materialize its number pool.
///
/// Inserts the metadata row, then slot rows 1..=max_number in batches, then
/// links the selected forms. There is no surrounding transaction: on any
/// failure the partially created pool is removed by deleting the meeting row
/// (slots and links cascade) and the error reports whether that rollback
/// succeeded. Residual partial state is a surfaced failure mode, never a
/// silent one.
pub fn create_with_pool(
    conn: &Connection,
    meeting_name: &str,
    max_number: i64,
    form_ids: &[i64],
) -> Result<Meeting, AppError> {
    let meeting_name = meeting_name.trim();
    if meeting_name.is_empty() {
        return Err(AppError::Validation(
            "Meeting name must not be empty".to_string(),
        ));
    }
    if !(1..=MAX_POOL_SIZE).contains(&max_number) {
        return Err(AppError::Validation(format!(
            "Max number must be between 1 and {MAX_POOL_SIZE}"
        )));
    }

    let slug = make_slug(meeting_name);
    let created_at = Utc::now().to_rfc3339();

    let inserted = conn.execute(
        "INSERT INTO meetings (slug, meeting_name, created_at, max_number) \
         VALUES (?1, ?2, ?3, ?4)",
        params![slug, meeting_name, created_at, max_number],
    );
    if let Err(e) = inserted {
        if is_unique_violation(&e) {
            return Err(AppError::Validation(
                "A meeting with this identifier already exists, try another name".to_string(),
            ));
        }
        return Err(e.into());
    }
    let meeting_id = conn.last_insert_rowid();

    if let Err(e) = materialize_pool(conn, meeting_id, max_number)
        .and_then(|_| link_forms(conn, meeting_id, form_ids))
    {
        let rolled_back = rollback_partial(conn, meeting_id);
        return Err(AppError::PoolCreationFailed {
            reason: e.to_string(),
            rolled_back,
        });
    }

    Ok(Meeting {
        id: meeting_id,
        slug,
        meeting_name: meeting_name.to_string(),
        created_at,
        max_number,
    })
}

fn materialize_pool(
    conn: &Connection,
    meeting_id: i64,
    max_number: i64,
) -> rusqlite::Result<()> {
    let numbers: Vec<i64> = (1..=max_number).collect();
    for batch in numbers.chunks(SLOT_INSERT_BATCH) {
        let placeholders: Vec<String> = (0..batch.len())
            .map(|i| format!("(?{}, ?{}, 0)", i * 2 + 1, i * 2 + 2))
            .collect();
        let sql = format!(
            "INSERT INTO slots (meeting_id, number, assigned) VALUES {}",
            placeholders.join(", ")
        );
        let mut values: Vec<i64> = Vec::with_capacity(batch.len() * 2);
        for number in batch {
            values.push(meeting_id);
            values.push(*number);
        }
        conn.execute(&sql, rusqlite::params_from_iter(values))?;
    }
    Ok(())
}

fn link_forms(conn: &Connection, meeting_id: i64, form_ids: &[i64]) -> rusqlite::Result<()> {
    for form_id in form_ids {
        conn.execute(
            "INSERT INTO meeting_forms (meeting_id, form_id) VALUES (?1, ?2)",
            params![meeting_id, form_id],
        )?;
    }
    Ok(())
}

/// Best-effort compensating rollback: drop the metadata row, cascading to
/// whatever slots and links were already inserted.
fn rollback_partial(conn: &Connection, meeting_id: i64) -> bool {
    match conn.execute("DELETE FROM meetings WHERE id = ?1", params![meeting_id]) {
        Ok(_) => true,
        Err(e) => {
            log::error!("Rollback of partially created meeting {meeting_id} failed: {e}");
            false
        }
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn map_meeting_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Meeting> {
    Ok(Meeting {
        id: row.get("id")?,
        slug: row.get("slug")?,
        meeting_name: row.get("meeting_name")?,
        created_at: row.get("created_at")?,
        max_number: row.get("max_number")?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Meeting>, AppError> {
    conn.query_row(
        "SELECT id, slug, meeting_name, created_at, max_number FROM meetings WHERE id = ?1",
        params![id],
        map_meeting_row,
    )
    .optional()
    .map_err(Into::into)
}

pub fn find_by_slug(conn: &Connection, slug: &str) -> Result<Option<Meeting>, AppError> {
    conn.query_row(
        "SELECT id, slug, meeting_name, created_at, max_number FROM meetings WHERE slug = ?1",
        params![slug],
        map_meeting_row,
    )
    .optional()
    .map_err(Into::into)
}

/// All meetings with their assigned-slot counts, newest first.
/// Empty list when none exist; an error only when the query itself fails.
pub fn list_all(conn: &Connection) -> Result<Vec<MeetingListItem>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.slug, m.meeting_name, m.created_at, m.max_number, \
                (SELECT COUNT(*) FROM slots s \
                 WHERE s.meeting_id = m.id AND s.assigned = 1) AS assigned_count \
         FROM meetings m \
         ORDER BY m.created_at DESC, m.id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(MeetingListItem {
            id: row.get("id")?,
            slug: row.get("slug")?,
            meeting_name: row.get("meeting_name")?,
            created_at: row.get("created_at")?,
            max_number: row.get("max_number")?,
            assigned_count: row.get("assigned_count")?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Pool occupancy counts for one meeting.
pub fn stats(conn: &Connection, meeting_id: i64) -> Result<MeetingStats, AppError> {
    let (total, assigned): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(assigned), 0) FROM slots WHERE meeting_id = ?1",
        params![meeting_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let percent = if total > 0 {
        assigned as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    Ok(MeetingStats {
        total_numbers: total,
        assigned_numbers: assigned,
        percent_assigned: percent,
    })
}

/// Delete a meeting; slots and form links cascade. Returns false when the
/// meeting did not exist.
pub fn delete(conn: &Connection, meeting_id: i64) -> Result<bool, AppError> {
    let changed = conn.execute("DELETE FROM meetings WHERE id = ?1", params![meeting_id])?;
    Ok(changed > 0)
}
