//! Common validation utilities for request payloads.

use validator::ValidationError;

/// Minimum length of a team name after trimming.
pub const MIN_TEAM_NAME_LEN: usize = 3;

/// Maximum length of a team name.
pub const MAX_TEAM_NAME_LEN: usize = 100;

/// Maximum length of a free-text message (invitations, join requests).
pub const MAX_MESSAGE_LEN: usize = 500;

/// Maximum length of a team category label.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Validates a team name: at least 3 characters after trimming whitespace,
/// at most 100 characters.
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_TEAM_NAME_LEN {
        let mut err = ValidationError::new("team_name_too_short");
        err.message = Some("Team name must be at least 3 characters".into());
        return Err(err);
    }
    if name.chars().count() > MAX_TEAM_NAME_LEN {
        let mut err = ValidationError::new("team_name_too_long");
        err.message = Some("Team name must be at most 100 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates an optional free-text message attached to an invitation or
/// join request.
pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.chars().count() > MAX_MESSAGE_LEN {
        let mut err = ValidationError::new("message_too_long");
        err.message = Some("Message must be at most 500 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a team category label.
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        let mut err = ValidationError::new("category_empty");
        err.message = Some("Category must not be blank".into());
        return Err(err);
    }
    if category.chars().count() > MAX_CATEGORY_LEN {
        let mut err = ValidationError::new("category_too_long");
        err.message = Some("Category must be at most 50 characters".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_name_valid() {
        assert!(validate_team_name("Atelier Noir").is_ok());
        assert!(validate_team_name("abc").is_ok());
    }

    #[test]
    fn test_team_name_too_short() {
        assert!(validate_team_name("ab").is_err());
        assert!(validate_team_name("").is_err());
    }

    #[test]
    fn test_team_name_whitespace_only() {
        assert!(validate_team_name("   ").is_err());
    }

    #[test]
    fn test_team_name_trimmed_length_counts() {
        // Two visible characters padded with spaces is still too short
        assert!(validate_team_name("  ab  ").is_err());
        assert!(validate_team_name("  abc  ").is_ok());
    }

    #[test]
    fn test_team_name_too_long() {
        let name = "x".repeat(MAX_TEAM_NAME_LEN + 1);
        assert!(validate_team_name(&name).is_err());
        let name = "x".repeat(MAX_TEAM_NAME_LEN);
        assert!(validate_team_name(&name).is_ok());
    }

    #[test]
    fn test_message_length() {
        assert!(validate_message("").is_ok());
        assert!(validate_message("come sew with us").is_ok());
        assert!(validate_message(&"m".repeat(MAX_MESSAGE_LEN)).is_ok());
        assert!(validate_message(&"m".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }

    #[test]
    fn test_category() {
        assert!(validate_category("streetwear").is_ok());
        assert!(validate_category("  ").is_err());
        assert!(validate_category(&"c".repeat(MAX_CATEGORY_LEN + 1)).is_err());
    }
}
