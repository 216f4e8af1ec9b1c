//! Post domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Maximum post content length in characters
pub const MAX_POST_CONTENT_LEN: usize = 200;

/// A post on the feed: text, an image, or both
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub content: Option<String>,
    /// Public route to the stored image, e.g. "/uploads/abc_photo.jpg"
    pub image_path: Option<String>,
    /// Email of the owning user; fixed after creation
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            id: 0,
            content: None,
            image_path: None,
            user_email: user_email.into(),
            created_at: Utc::now(),
        }
    }

    /// Check the creation invariant: at least one of content / image present
    /// (after trimming), and content within the length bound.
    pub fn validate(&self) -> Result<()> {
        if let Some(content) = &self.content {
            if content.chars().count() > MAX_POST_CONTENT_LEN {
                return Err(Error::validation(format!(
                    "Post content cannot exceed {} characters.",
                    MAX_POST_CONTENT_LEN
                )));
            }
        }

        let has_content = self
            .content
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false);
        let has_image = self
            .image_path
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false);

        if !has_content && !has_image {
            return Err(Error::validation(
                "Either content or an image is required to create a post.",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_requires_content_or_image() {
        let mut post = Post::new("test@example.com");
        assert!(post.validate().is_err());

        post.content = Some("   ".to_string());
        assert!(post.validate().is_err(), "whitespace-only content is empty");

        post.content = Some("hello".to_string());
        assert!(post.validate().is_ok());

        post.content = None;
        post.image_path = Some("/uploads/x.jpg".to_string());
        assert!(post.validate().is_ok());
    }

    #[test]
    fn test_post_content_length_bound() {
        let mut post = Post::new("test@example.com");
        post.content = Some("x".repeat(MAX_POST_CONTENT_LEN + 1));
        assert!(post.validate().is_err());

        post.content = Some("x".repeat(MAX_POST_CONTENT_LEN));
        assert!(post.validate().is_ok());
    }
}
