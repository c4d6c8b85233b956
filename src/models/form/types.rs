use serde::Deserialize;

pub const QUESTION_TYPE_TEXT: &str = "text";
pub const QUESTION_TYPE_MULTIPLE_CHOICE: &str = "multiple_choice";

/// Form metadata.
#[derive(Debug, Clone)]
pub struct Form {
    pub id: i64,
    /// Unique identifier, embedded in shareable links as `table=`.
    pub slug: String,
    pub form_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub form_id: i64,
    pub question_text: String,
    /// `text` or `multiple_choice`.
    pub question_type: String,
    /// For multiple choice this holds the correct option's id as text; for
    /// text questions the expected answer. None means the question is not
    /// graded.
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuestionOption {
    pub id: i64,
    pub option_text: String,
}

/// A question with its options resolved, as rendered to participants.
#[derive(Debug, Clone)]
pub struct QuestionWithOptions {
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

/// Authoring draft for a new form. Accumulated by the caller (the UI keeps
/// it while the author adds questions) and persisted only on create — there
/// is no partially saved authoring state on the server.
#[derive(Debug, Clone, Deserialize)]
pub struct FormDraft {
    pub form_name: String,
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub question_text: String,
    /// `text` or `multiple_choice`.
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// For multiple choice, the text of the correct option; for text
    /// questions, the expected answer. Optional — ungraded otherwise.
    #[serde(default)]
    pub correct: Option<String>,
}
