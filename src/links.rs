//! Shareable participant links.
//!
//! Link format is an external contract: the pool identifier, the flow mode
//! and the optional participant token are the only routing parameters a UI
//! needs to enter the right flow.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Participant,
    ParticipantForm,
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkMode::Participant => write!(f, "participant"),
            LinkMode::ParticipantForm => write!(f, "participant_form"),
        }
    }
}

/// Build a shareable link for a meeting pool or a form.
///
/// With a token the link is persistent for that participant; without one it
/// is a generic entry link and a token is minted on first visit.
pub fn participant_link(
    base_url: &str,
    slug: &str,
    user_id: Option<&str>,
    mode: LinkMode,
) -> String {
    let base = base_url.trim_end_matches('/');
    match user_id {
        Some(token) => format!("{base}/?table={slug}&mode={mode}&user_id={token}"),
        None => format!("{base}/?table={slug}&mode={mode}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_link_has_no_user_id() {
        let link = participant_link(
            "https://plenum.example.com",
            "meeting_1700000000_kickoff",
            None,
            LinkMode::Participant,
        );
        assert_eq!(
            link,
            "https://plenum.example.com/?table=meeting_1700000000_kickoff&mode=participant"
        );
    }

    #[test]
    fn persistent_link_carries_token_and_mode() {
        let link = participant_link(
            "https://plenum.example.com/",
            "form_1700000000_quiz",
            Some("abc123"),
            LinkMode::ParticipantForm,
        );
        assert_eq!(
            link,
            "https://plenum.example.com/?table=form_1700000000_quiz&mode=participant_form&user_id=abc123"
        );
    }
}
