/// Meeting metadata. Immutable after creation except via deletion.
#[derive(Debug, Clone)]
pub struct Meeting {
    pub id: i64,
    /// Pool identifier, unique, embedded in shareable links as `table=`.
    pub slug: String,
    pub meeting_name: String,
    pub created_at: String,
    pub max_number: i64,
}

/// For the management list: metadata plus pool occupancy.
#[derive(Debug, Clone)]
pub struct MeetingListItem {
    pub id: i64,
    pub slug: String,
    pub meeting_name: String,
    pub created_at: String,
    pub max_number: i64,
    pub assigned_count: i64,
}

/// Pool occupancy for one meeting.
#[derive(Debug, Clone)]
pub struct MeetingStats {
    pub total_numbers: i64,
    pub assigned_numbers: i64,
    pub percent_assigned: f64,
}
