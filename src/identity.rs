//! Participant identity tokens.
//!
//! A token is an opaque value minted once per participant and carried in the
//! `user_id` URL parameter, so a saved link always resolves to the same
//! number. It is independent of the assigned number itself.

use rand::Rng;

use crate::errors::AppError;

/// Generate a random 32-byte hex token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Tokens are opaque, but they must survive a URL query-parameter round trip
/// and are stored verbatim on slot rows.
pub fn validate_token(token: &str) -> Result<(), AppError> {
    if token.is_empty() || token.len() > 128 {
        return Err(AppError::Validation(
            "Participant token must be 1-128 characters".to_string(),
        ));
    }
    if !token
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(AppError::Validation(
            "Participant token contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
