//! Comment service - adding, listing, and owner-only editing of comments

use std::sync::Arc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{validate_comment_content, Comment};
use crate::services::require_login;

/// Comment service
pub struct CommentService {
    repository: Arc<DuckDbRepository>,
}

impl CommentService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Add a comment to a post.
    ///
    /// The referenced post must exist; the navigation is an explicit lookup,
    /// never an implicit load.
    pub fn add_comment(
        &self,
        identity: Option<&str>,
        post_id: i64,
        content: &str,
    ) -> Result<Comment> {
        let user_email = require_login(identity)?;
        validate_comment_content(content)?;

        if self.repository.get_post_by_id(post_id)?.is_none() {
            return Err(Error::not_found(format!("post {}", post_id)));
        }

        let comment = Comment::new(post_id, user_email, content);
        self.repository.add_comment(&comment)
    }

    /// Comments on a post, newest first. Open to unauthenticated callers.
    pub fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.repository.get_comments_for_post(post_id)
    }

    /// Delete a comment. Only the owner may delete.
    pub fn delete_comment(&self, identity: Option<&str>, id: i64) -> Result<()> {
        let user_email = require_login(identity)?;

        let comment = self
            .repository
            .get_comment_by_id(id)?
            .ok_or_else(|| Error::not_found(format!("comment {}", id)))?;

        if comment.user_email != user_email {
            return Err(Error::forbidden(
                "You are not authorized to delete this comment.",
            ));
        }

        self.repository.delete_comment(id)
    }

    /// Replace a comment's content in place. Only the owner may edit.
    ///
    /// Empty content is rejected before the lookup, so a blank edit of a
    /// missing comment reports the validation failure, not the absence.
    pub fn edit_comment(
        &self,
        identity: Option<&str>,
        id: i64,
        updated_content: &str,
    ) -> Result<Comment> {
        let user_email = require_login(identity)?;
        validate_comment_content(updated_content)?;

        let mut comment = self
            .repository
            .get_comment_by_id(id)?
            .ok_or_else(|| Error::not_found(format!("comment {}", id)))?;

        if comment.user_email != user_email {
            return Err(Error::forbidden(
                "You are not authorized to edit this comment.",
            ));
        }

        comment.content = updated_content.to_string();
        self.repository.update_comment(&comment)?;
        Ok(comment)
    }
}
