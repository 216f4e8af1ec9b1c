//! Status service - database row-count summary

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Result;

/// Status service for database summaries
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        Ok(StatusSummary {
            total_users: self.repository.get_user_count()?,
            total_posts: self.repository.get_post_count()?,
            total_comments: self.repository.get_comment_count()?,
            total_friendships: self.repository.get_friend_count()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_users: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_friendships: i64,
}
