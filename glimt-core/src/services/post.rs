//! Post service - post creation, feed, and owner-only editing
//!
//! This is the controller logic for posts: each operation takes the caller's
//! resolved identity explicitly, validates input, performs the ownership
//! check where one applies, and delegates to the repository.

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::Post;
use crate::services::media::MediaService;
use crate::services::require_login;

/// Fixed page size for the public feed
pub const FEED_PAGE_SIZE: i64 = 10;

/// Input for creating a post
#[derive(Debug, Default)]
pub struct NewPostInput {
    pub content: Option<String>,
    pub image: Option<ImageUpload>,
}

/// An uploaded image: original file name plus raw bytes
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Input for updating a post's content
#[derive(Debug)]
pub struct UpdatePostRequest {
    pub id: i64,
    pub content: String,
}

/// One page of the public feed
#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub page: i64,
    pub page_size: i64,
    pub total_posts: i64,
}

/// Post service
pub struct PostService {
    repository: Arc<DuckDbRepository>,
    media: MediaService,
}

impl PostService {
    pub fn new(repository: Arc<DuckDbRepository>, media: MediaService) -> Self {
        Self { repository, media }
    }

    /// Create a new post for the caller.
    ///
    /// An uploaded image is stored through the media service and the post
    /// carries its public route. After trimming, a post with neither content
    /// nor image is rejected.
    pub fn create_post(&self, identity: Option<&str>, input: NewPostInput) -> Result<Post> {
        let user_email = require_login(identity)?;

        let mut post = Post::new(user_email);
        post.content = input.content.filter(|c| !c.trim().is_empty());

        if let Some(image) = &input.image {
            post.image_path = Some(self.media.store_image(&image.file_name, &image.bytes)?);
        }

        post.validate()?;

        self.repository.create_post(&post)
    }

    /// One page of the feed, newest first. Open to unauthenticated callers.
    pub fn feed(&self, page: Option<i64>) -> Result<FeedPage> {
        let page = page.unwrap_or(1).max(1);
        let posts = self.repository.get_posts_paged(page, FEED_PAGE_SIZE)?;
        let total_posts = self.repository.get_post_count()?;

        Ok(FeedPage {
            posts,
            page,
            page_size: FEED_PAGE_SIZE,
            total_posts,
        })
    }

    /// All posts owned by the caller, newest first
    pub fn my_posts(&self, identity: Option<&str>) -> Result<Vec<Post>> {
        let user_email = require_login(identity)?;
        self.repository.get_posts_by_user(user_email)
    }

    /// Fetch a post for the editing state of the own-posts view
    pub fn edit_post(&self, identity: Option<&str>, id: i64) -> Result<Post> {
        require_login(identity)?;
        self.repository
            .get_post_by_id(id)?
            .ok_or_else(|| Error::not_found(format!("post {}", id)))
    }

    /// Replace a post's content. Only the owner may update; every other
    /// field is left untouched.
    pub fn update_post(&self, identity: Option<&str>, request: UpdatePostRequest) -> Result<Post> {
        let user_email = require_login(identity)?;

        if request.content.trim().is_empty() {
            return Err(Error::validation("Content cannot be empty."));
        }

        let mut post = self
            .repository
            .get_post_by_id(request.id)?
            .ok_or_else(|| Error::not_found(format!("post {}", request.id)))?;

        if post.user_email != user_email {
            return Err(Error::forbidden(
                "You are not authorized to update this post.",
            ));
        }

        post.content = Some(request.content);
        self.repository.update_post(&post)?;
        Ok(post)
    }

    /// Delete a post. Only the owner may delete.
    pub fn delete_post(&self, identity: Option<&str>, id: i64) -> Result<()> {
        let user_email = require_login(identity)?;

        let post = self
            .repository
            .get_post_by_id(id)?
            .ok_or_else(|| Error::not_found(format!("post {}", id)))?;

        if post.user_email != user_email {
            return Err(Error::forbidden(
                "You are not authorized to delete this post.",
            ));
        }

        self.repository.delete_post(id)
    }
}
