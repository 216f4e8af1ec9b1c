//! Comment domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Maximum comment length in characters
pub const MAX_COMMENT_LEN: usize = 200;

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    /// Email of the owning user; only they may edit or delete it
    pub user_email: String,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: i64, user_email: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            content: content.into(),
            user_email: user_email.into(),
            post_id,
            created_at: Utc::now(),
        }
    }
}

/// Validate comment content: required, non-blank, length-bounded.
pub fn validate_comment_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::validation("The comment cannot be empty."));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(Error::validation(format!(
            "The comment cannot exceed {} characters.",
            MAX_COMMENT_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_content_validation() {
        assert!(validate_comment_content("").is_err());
        assert!(validate_comment_content("   ").is_err());
        assert!(validate_comment_content("nice shot!").is_ok());
        assert!(validate_comment_content(&"y".repeat(MAX_COMMENT_LEN)).is_ok());
        assert!(validate_comment_content(&"y".repeat(MAX_COMMENT_LEN + 1)).is_err());
    }
}
