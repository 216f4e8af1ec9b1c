//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod comment;
mod friend;
mod post;
pub mod result;
mod user;

pub use comment::{validate_comment_content, Comment, MAX_COMMENT_LEN};
pub use friend::Friend;
pub use post::{Post, MAX_POST_CONTENT_LEN};
pub use user::User;
