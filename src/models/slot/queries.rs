use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::AppError;

use super::types::*;

/// Number already bound to this identity in the given pool, if any.
pub fn find_owned_number(
    conn: &Connection,
    meeting_id: i64,
    user_id: &str,
) -> Result<Option<i64>, AppError> {
    conn.query_row(
        "SELECT number FROM slots WHERE meeting_id = ?1 AND user_id = ?2",
        params![meeting_id, user_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Numbers of all currently unassigned slots in a pool.
pub fn unassigned_numbers(conn: &Connection, meeting_id: i64) -> Result<Vec<i64>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT number FROM slots WHERE meeting_id = ?1 AND assigned = 0 ORDER BY number",
    )?;
    let rows = stmt.query_map(params![meeting_id], |row| row.get(0))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Full slot table for one meeting, ordered by number. Used by the CSV export.
pub fn list_all(conn: &Connection, meeting_id: i64) -> Result<Vec<Slot>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT number, assigned, assigned_at, user_id \
         FROM slots WHERE meeting_id = ?1 ORDER BY number",
    )?;
    let rows = stmt.query_map(params![meeting_id], |row| {
        Ok(Slot {
            number: row.get("number")?,
            assigned: row.get("assigned")?,
            assigned_at: row.get("assigned_at")?,
            user_id: row.get("user_id")?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Every claimed slot across all pools, for the per-user link listing.
pub fn assigned_across_pools(conn: &Connection) -> Result<Vec<AssignedSlot>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT number, user_id FROM slots \
         WHERE assigned = 1 AND user_id IS NOT NULL \
         ORDER BY number",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(AssignedSlot {
            number: row.get("number")?,
            user_id: row.get("user_id")?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Scan all known pools for a slot bound to this identity. Participants
/// must hold a number somewhere before they may answer forms.
pub fn find_number_for_identity(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<ParticipantNumber>, AppError> {
    conn.query_row(
        "SELECT s.meeting_id, m.slug, s.number \
         FROM slots s JOIN meetings m ON m.id = s.meeting_id \
         WHERE s.user_id = ?1 \
         ORDER BY s.meeting_id LIMIT 1",
        params![user_id],
        |row| {
            Ok(ParticipantNumber {
                meeting_id: row.get(0)?,
                meeting_slug: row.get(1)?,
                number: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}
