//! Glimt Core - Business logic for a small photo-sharing social network
//!
//! This crate implements the core domain logic in layers:
//!
//! - **domain**: Core business entities (Post, Comment, Friend, User)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete storage implementation (DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Comment, Friend, Post, User};

/// Main context for Glimt operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
pub struct GlimtContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub friend_service: FriendService,
    pub status_service: StatusService,
}

impl GlimtContext {
    /// Create a new Glimt context
    pub fn new(glimt_dir: &Path) -> Result<Self> {
        let config = Config::load(glimt_dir)?;

        // Determine which database file to use
        let db_filename = if config.demo_mode {
            "demo.duckdb"
        } else {
            "glimt.duckdb"
        };

        let db_path = glimt_dir.join(db_filename);
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        // Create services
        let media_service = MediaService::new(config.uploads_path(glimt_dir));
        let post_service = PostService::new(Arc::clone(&repository), media_service);
        let comment_service = CommentService::new(Arc::clone(&repository));
        let friend_service = FriendService::new(Arc::clone(&repository));
        let status_service = StatusService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            post_service,
            comment_service,
            friend_service,
            status_service,
        })
    }
}
