//! Seed service - fixture data and demo mode
//!
//! Demo mode provides a pre-populated database for trying out the app
//! without a real user base. The fixtures are only inserted when the
//! corresponding tables are empty, so repeated startups don't duplicate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::adapters::duckdb::DuckDbRepository;
use crate::config::Config;
use crate::domain::result::Result;
use crate::domain::{Comment, Post, User};

/// Seed service for fixture data and demo mode
pub struct SeedService {
    glimt_dir: PathBuf,
}

impl SeedService {
    pub fn new(glimt_dir: &Path) -> Self {
        Self {
            glimt_dir: glimt_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.glimt_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// This will:
    /// 1. Delete any existing demo database (fresh start)
    /// 2. Enable demo mode in config
    /// 3. Create the demo database and seed fixture data
    pub fn enable(&self) -> Result<()> {
        let demo_db = self.glimt_dir.join("demo.duckdb");
        let demo_wal = self.glimt_dir.join("demo.duckdb.wal");
        if demo_db.exists() {
            std::fs::remove_file(&demo_db)?;
        }
        if demo_wal.exists() {
            std::fs::remove_file(&demo_wal)?;
        }

        let mut config = Config::load(&self.glimt_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.glimt_dir)?;

        let repository = Arc::new(DuckDbRepository::new(&demo_db)?);
        repository.ensure_schema()?;
        Self::seed(&repository)?;

        Ok(())
    }

    /// Disable demo mode, optionally deleting the demo database
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.glimt_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.glimt_dir)?;

        if clean {
            let demo_db = self.glimt_dir.join("demo.duckdb");
            let demo_wal = self.glimt_dir.join("demo.duckdb.wal");
            if demo_db.exists() {
                std::fs::remove_file(&demo_db)?;
            }
            if demo_wal.exists() {
                std::fs::remove_file(&demo_wal)?;
            }
        }

        Ok(())
    }

    /// Seed fixture users, posts, and comments into an empty database.
    ///
    /// Tables that already hold rows are left alone.
    pub fn seed(repository: &DuckDbRepository) -> Result<()> {
        for email in [
            "jane@example.com",
            "john@example.com",
            "selma@example.com",
            "sara@example.com",
            "travis@example.com",
            "drew@example.com",
        ] {
            repository.upsert_user(&User::new(email))?;
        }

        let anchor_post_id = if repository.get_post_count()? == 0 {
            let fixtures = [
                (
                    "Exploring the beautiful landscapes of Norway!",
                    Some("/images/norway.jpg"),
                    "jane@example.com",
                    10,
                ),
                (
                    "Had an amazing time at the tech conference!",
                    Some("/images/conference.jpg"),
                    "john@example.com",
                    5,
                ),
                (
                    "Sunsets like these make everything worth it.",
                    Some("/images/sunset.jpg"),
                    "selma@example.com",
                    2,
                ),
                (
                    "Trying out new recipes today. Cooking vibes!",
                    Some("/images/recipes.jpg"),
                    "sara@example.com",
                    1,
                ),
            ];

            let mut ids = Vec::new();
            for (content, image_path, email, days_ago) in fixtures {
                let mut post = Post::new(email);
                post.content = Some(content.to_string());
                post.image_path = image_path.map(|p| p.to_string());
                post.created_at = Utc::now() - Duration::days(days_ago);
                ids.push(repository.create_post(&post)?.id);
            }
            Some(ids[0])
        } else {
            // Attach fixture comments to the oldest existing post
            repository
                .get_posts()?
                .into_iter()
                .min_by_key(|p| p.created_at)
                .map(|p| p.id)
        };

        if repository.get_comment_count()? == 0 {
            if let Some(post_id) = anchor_post_id {
                let comments = [
                    ("This looks amazing!", "travis@example.com", 8),
                    ("I want to visit Norway someday!", "drew@example.com", 7),
                ];
                for (content, email, days_ago) in comments {
                    let mut comment = Comment::new(post_id, email, content);
                    comment.created_at = Utc::now() - Duration::days(days_ago);
                    repository.add_comment(&comment)?;
                }
            }
        }

        Ok(())
    }
}
