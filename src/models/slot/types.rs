/// One number's row within a meeting pool.
#[derive(Debug, Clone)]
pub struct Slot {
    pub number: i64,
    pub assigned: bool,
    pub assigned_at: Option<String>,
    pub user_id: Option<String>,
}

/// A claimed slot together with the identity that holds it.
#[derive(Debug, Clone)]
pub struct AssignedSlot {
    pub number: i64,
    pub user_id: String,
}

/// Where an identity's number lives: which pool, which number.
#[derive(Debug, Clone)]
pub struct ParticipantNumber {
    pub meeting_id: i64,
    pub meeting_slug: String,
    pub number: i64,
}
