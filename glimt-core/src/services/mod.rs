//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and repository access. Each service
//! focuses on a specific feature area. Operations that require a caller
//! identity take it explicitly as `Option<&str>` (the email of the logged-in
//! user) and fail with `Error::Unauthorized` when it is absent.

mod comment;
mod friend;
mod media;
mod post;
mod seed;
mod status;

pub mod logging;
pub mod migration;

pub use comment::CommentService;
pub use friend::{FriendService, FriendsOverview};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use media::MediaService;
pub use migration::{MigrationResult, MigrationService};
pub use post::{
    FeedPage, ImageUpload, NewPostInput, PostService, UpdatePostRequest, FEED_PAGE_SIZE,
};
pub use seed::SeedService;
pub use status::{StatusService, StatusSummary};

use crate::domain::result::{Error, Result};

/// Resolve the caller identity, rejecting anonymous callers.
pub(crate) fn require_login(identity: Option<&str>) -> Result<&str> {
    match identity {
        Some(email) if !email.trim().is_empty() => Ok(email),
        _ => Err(Error::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_login_accepts_email() {
        assert_eq!(require_login(Some("a@example.com")).unwrap(), "a@example.com");
    }

    #[test]
    fn test_require_login_rejects_missing_and_blank() {
        assert!(matches!(require_login(None), Err(Error::Unauthorized)));
        assert!(matches!(require_login(Some("  ")), Err(Error::Unauthorized)));
    }
}
