/// One stored answer. `participant_id` is the participant's assigned number
/// rendered as text, not the identity token.
#[derive(Debug, Clone)]
pub struct ResponseRow {
    pub id: i64,
    pub form_id: i64,
    pub participant_id: String,
    pub question_id: i64,
    pub answer: String,
    pub submitted_at: String,
}

/// One graded answer for the statistics and export views. `verdict` is
/// `Correta`, `Incorreta` or `N/A` (ungraded question).
#[derive(Debug, Clone)]
pub struct GradedResponse {
    pub participant_id: String,
    pub form_name: String,
    pub question_text: String,
    pub answer_display: String,
    pub verdict: String,
}
