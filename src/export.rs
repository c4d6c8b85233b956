//! CSV dumps of the slot table and of graded responses, for offline
//! analysis. Whole-table only — no filtering or pagination.

use crate::models::response::GradedResponse;
use crate::models::slot::Slot;

/// Quote a field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Full slot-table dump for one meeting.
pub fn slots_csv(slots: &[Slot]) -> String {
    let mut out = String::from("number,assigned,assigned_at,user_id\n");
    for slot in slots {
        let number = slot.number.to_string();
        let assigned = if slot.assigned { "true" } else { "false" };
        out.push_str(&csv_line(&[
            &number,
            assigned,
            slot.assigned_at.as_deref().unwrap_or(""),
            slot.user_id.as_deref().unwrap_or(""),
        ]));
        out.push('\n');
    }
    out
}

/// Graded-response dump, one row per recorded answer.
pub fn responses_csv(rows: &[GradedResponse]) -> String {
    let mut out = String::from("participant,form,question,answer,verdict\n");
    for row in rows {
        out.push_str(&csv_line(&[
            &row.participant_id,
            &row.form_name,
            &row.question_text,
            &row.answer_display,
            &row.verdict,
        ]));
        out.push('\n');
    }
    out
}
