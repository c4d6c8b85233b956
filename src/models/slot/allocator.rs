//! Number assignment.
//!
//! All slot mutation goes through [`assign_or_get`]; no other code path
//! flips `assigned` or rebinds `user_id`. The claim itself is a conditional
//! update (`... AND assigned = 0`) so two racing participants can never end
//! up holding the same number: the loser's update affects zero rows and it
//! retries with a fresh candidate.

use chrono::Utc;
use rand::Rng;
use rusqlite::{Connection, params};

use crate::errors::AppError;

use super::queries;

/// Assign a number to `identity` in the meeting's pool, or return the one it
/// already holds. Idempotent per identity, which is what makes persistent
/// shareable links work.
///
/// The candidate is chosen uniformly at random among the unassigned numbers
/// rather than lowest-first, so the allocation order is not predictable.
/// Lost claim races are retried, bounded by the number of unassigned slots
/// observed on the first pass: every lost race means another slot was
/// claimed in the meantime, so the loop always terminates.
pub fn assign_or_get(
    conn: &Connection,
    meeting_id: i64,
    identity: &str,
) -> Result<i64, AppError> {
    let mut budget: Option<usize> = None;
    loop {
        if let Some(number) = queries::find_owned_number(conn, meeting_id, identity)? {
            return Ok(number);
        }
        let candidates = queries::unassigned_numbers(conn, meeting_id)?;
        if candidates.is_empty() {
            return Err(AppError::PoolExhausted);
        }
        let budget = budget.get_or_insert(candidates.len());

        let pick = candidates[rand::rng().random_range(0..candidates.len())];
        if try_claim(conn, meeting_id, pick, identity)? {
            return Ok(pick);
        }

        // Someone else claimed the slot between our read and our write.
        if *budget == 0 {
            return Err(AppError::PoolExhausted);
        }
        *budget -= 1;
    }
}

/// Conditional write: claims the slot only if it is still unassigned.
/// Exactly one affected row means the claim won; zero means a concurrent
/// caller got there first.
fn try_claim(
    conn: &Connection,
    meeting_id: i64,
    number: i64,
    identity: &str,
) -> Result<bool, AppError> {
    let changed = conn.execute(
        "UPDATE slots SET assigned = 1, assigned_at = ?3, user_id = ?4 \
         WHERE meeting_id = ?1 AND number = ?2 AND assigned = 0",
        params![meeting_id, number, Utc::now().to_rfc3339(), identity],
    )?;
    Ok(changed == 1)
}
