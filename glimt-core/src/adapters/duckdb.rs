//! DuckDB repository implementation
//!
//! Every operation is an independent unit of work against the store. Storage
//! failures are converted at this boundary into `Error::Database` carrying
//! the operation context; absent rows are `Ok(None)` on lookups and
//! `Error::NotFound` on deletes, so callers can tell "not found" from
//! "storage error" from "empty result".

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::domain::{Comment, Friend, Post, User};
use crate::services::MigrationService;

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Create a new DuckDB repository
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which can occur when two glimt processes touch the database at once.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[glimt] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default()
            .enable_autoload_extension(false)
            .map_err(|e| Error::database(format!("open config: {}", e)))?;
        let conn = Connection::open_with_flags(db_path, config)
            .map_err(|e| Error::database(format!("open {}: {}", db_path.display(), e)))?;
        Ok(conn)
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service.run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Path of the underlying database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // === Post operations ===

    pub fn get_posts(&self) -> Result<Vec<Post>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT post_id, content, image_path, user_email, created_at FROM posts")
            .map_err(|e| Error::database(format!("get_posts: {}", e)))?;

        let posts = stmt
            .query_map([], |row| Ok(row_to_post(row)))
            .map_err(|e| Error::database(format!("get_posts: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(posts)
    }

    pub fn get_post_by_id(&self, id: i64) -> Result<Option<Post>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT post_id, content, image_path, user_email, created_at
                 FROM posts WHERE post_id = ?",
            )
            .map_err(|e| Error::database(format!("get_post_by_id({}): {}", id, e)))?;

        match stmt.query_row([id], |row| Ok(row_to_post(row))) {
            Ok(post) => Ok(Some(post)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::database(format!("get_post_by_id({}): {}", id, e))),
        }
    }

    /// Get all posts owned by a user, newest first
    pub fn get_posts_by_user(&self, user_email: &str) -> Result<Vec<Post>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT post_id, content, image_path, user_email, created_at
                 FROM posts WHERE user_email = ?
                 ORDER BY created_at DESC, post_id DESC",
            )
            .map_err(|e| Error::database(format!("get_posts_by_user: {}", e)))?;

        let posts = stmt
            .query_map([user_email], |row| Ok(row_to_post(row)))
            .map_err(|e| Error::database(format!("get_posts_by_user: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(posts)
    }

    pub fn get_post_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .map_err(|e| Error::database(format!("get_post_count: {}", e)))
    }

    /// Get one page of posts, newest first.
    ///
    /// Page numbers below 1 are treated as page 1; there is no further
    /// negative-skip protection beyond this clamp.
    pub fn get_posts_paged(&self, page: i64, page_size: i64) -> Result<Vec<Post>> {
        let skip = (page.max(1) - 1) * page_size;
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT post_id, content, image_path, user_email, created_at
                 FROM posts
                 ORDER BY created_at DESC, post_id DESC
                 LIMIT ? OFFSET ?",
            )
            .map_err(|e| Error::database(format!("get_posts_paged: {}", e)))?;

        let posts = stmt
            .query_map([page_size, skip], |row| Ok(row_to_post(row)))
            .map_err(|e| Error::database(format!("get_posts_paged: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(posts)
    }

    /// Insert a new post, returning it with the assigned id
    pub fn create_post(&self, post: &Post) -> Result<Post> {
        let conn = self.conn.lock().unwrap();
        let id: i64 = conn
            .query_row(
                "INSERT INTO posts (content, image_path, user_email, created_at)
                 VALUES (?, ?, ?, ?)
                 RETURNING post_id",
                params![
                    post.content,
                    post.image_path,
                    post.user_email,
                    format_timestamp(&post.created_at),
                ],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(format!("create_post: {}", e)))?;

        Ok(Post { id, ..post.clone() })
    }

    /// Replace the stored content and image path of a post.
    ///
    /// No check that the row existed prior to this call - existence and
    /// ownership checks belong to the caller.
    pub fn update_post(&self, post: &Post) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE posts SET content = ?, image_path = ? WHERE post_id = ?",
            params![post.content, post.image_path, post.id],
        )
        .map_err(|e| Error::database(format!("update_post({}): {}", post.id, e)))?;
        Ok(())
    }

    pub fn delete_post(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM posts WHERE post_id = ?", params![id])
            .map_err(|e| Error::database(format!("delete_post({}): {}", id, e)))?;

        if deleted == 0 {
            return Err(Error::not_found(format!("post {}", id)));
        }
        Ok(())
    }

    // === Friend operations ===

    /// Insert a friendship row, returning it with the assigned id
    pub fn add_friend(&self, friend: &Friend) -> Result<Friend> {
        let conn = self.conn.lock().unwrap();
        let id: i64 = conn
            .query_row(
                "INSERT INTO friends (requester_email, friend_email, created_at)
                 VALUES (?, ?, ?)
                 RETURNING friend_id",
                params![
                    friend.requester_email,
                    friend.friend_email,
                    format_timestamp(&friend.created_at),
                ],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(format!("add_friend: {}", e)))?;

        Ok(Friend { id, ..friend.clone() })
    }

    pub fn get_friend_by_id(&self, id: i64) -> Result<Option<Friend>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT friend_id, requester_email, friend_email, created_at
                 FROM friends WHERE friend_id = ?",
            )
            .map_err(|e| Error::database(format!("get_friend_by_id({}): {}", id, e)))?;

        match stmt.query_row([id], |row| Ok(row_to_friend(row))) {
            Ok(friend) => Ok(Some(friend)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::database(format!("get_friend_by_id({}): {}", id, e))),
        }
    }

    pub fn remove_friend(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM friends WHERE friend_id = ?", params![id])
            .map_err(|e| Error::database(format!("remove_friend({}): {}", id, e)))?;

        if deleted == 0 {
            return Err(Error::not_found(format!("friendship {}", id)));
        }
        Ok(())
    }

    /// Friendships requested by a user (one-directional)
    pub fn get_friends(&self, user_email: &str) -> Result<Vec<Friend>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT friend_id, requester_email, friend_email, created_at
                 FROM friends WHERE requester_email = ?",
            )
            .map_err(|e| Error::database(format!("get_friends: {}", e)))?;

        let friends = stmt
            .query_map([user_email], |row| Ok(row_to_friend(row)))
            .map_err(|e| Error::database(format!("get_friends: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(friends)
    }

    pub fn get_friend_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM friends", [], |row| row.get(0))
            .map_err(|e| Error::database(format!("get_friend_count: {}", e)))
    }

    // === User operations ===

    /// All registered users except the given one
    pub fn get_users_except(&self, user_email: &str) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT email, created_at FROM users WHERE email != ?")
            .map_err(|e| Error::database(format!("get_users_except: {}", e)))?;

        let users = stmt
            .query_map([user_email], |row| Ok(row_to_user(row)))
            .map_err(|e| Error::database(format!("get_users_except: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(users)
    }

    /// Mirror a user row from the identity provider; existing rows are kept
    pub fn upsert_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (email, created_at) VALUES (?, ?)
             ON CONFLICT (email) DO NOTHING",
            params![user.email, format_timestamp(&user.created_at)],
        )
        .map_err(|e| Error::database(format!("upsert_user: {}", e)))?;
        Ok(())
    }

    pub fn get_user_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(|e| Error::database(format!("get_user_count: {}", e)))
    }

    // === Comment operations ===

    /// Insert a new comment, returning it with the assigned id
    pub fn add_comment(&self, comment: &Comment) -> Result<Comment> {
        let conn = self.conn.lock().unwrap();
        let id: i64 = conn
            .query_row(
                "INSERT INTO comments (content, user_email, post_id, created_at)
                 VALUES (?, ?, ?, ?)
                 RETURNING comment_id",
                params![
                    comment.content,
                    comment.user_email,
                    comment.post_id,
                    format_timestamp(&comment.created_at),
                ],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(format!("add_comment: {}", e)))?;

        Ok(Comment { id, ..comment.clone() })
    }

    /// Comments on a post, newest first
    pub fn get_comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT comment_id, content, user_email, post_id, created_at
                 FROM comments WHERE post_id = ?
                 ORDER BY created_at DESC, comment_id DESC",
            )
            .map_err(|e| Error::database(format!("get_comments_for_post: {}", e)))?;

        let comments = stmt
            .query_map([post_id], |row| Ok(row_to_comment(row)))
            .map_err(|e| Error::database(format!("get_comments_for_post: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(comments)
    }

    pub fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT comment_id, content, user_email, post_id, created_at
                 FROM comments WHERE comment_id = ?",
            )
            .map_err(|e| Error::database(format!("get_comment_by_id({}): {}", id, e)))?;

        match stmt.query_row([id], |row| Ok(row_to_comment(row))) {
            Ok(comment) => Ok(Some(comment)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::database(format!("get_comment_by_id({}): {}", id, e))),
        }
    }

    pub fn delete_comment(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM comments WHERE comment_id = ?", params![id])
            .map_err(|e| Error::database(format!("delete_comment({}): {}", id, e)))?;

        if deleted == 0 {
            return Err(Error::not_found(format!("comment {}", id)));
        }
        Ok(())
    }

    /// Replace the stored content of a comment; existence/ownership checks
    /// belong to the caller.
    pub fn update_comment(&self, comment: &Comment) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE comments SET content = ? WHERE comment_id = ?",
            params![comment.content, comment.id],
        )
        .map_err(|e| Error::database(format!("update_comment({}): {}", comment.id, e)))?;
        Ok(())
    }

    pub fn get_comment_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))
            .map_err(|e| Error::database(format!("get_comment_count: {}", e)))
    }
}

// Row mappers

fn row_to_post(row: &duckdb::Row) -> Post {
    // Columns: 0 post_id, 1 content, 2 image_path, 3 user_email, 4 created_at
    let created_str: String = row.get(4).unwrap_or_default();
    Post {
        id: row.get(0).unwrap_or_default(),
        content: row.get(1).ok(),
        image_path: row.get(2).ok(),
        user_email: row.get(3).unwrap_or_default(),
        created_at: parse_timestamp(&created_str),
    }
}

fn row_to_comment(row: &duckdb::Row) -> Comment {
    // Columns: 0 comment_id, 1 content, 2 user_email, 3 post_id, 4 created_at
    let created_str: String = row.get(4).unwrap_or_default();
    Comment {
        id: row.get(0).unwrap_or_default(),
        content: row.get(1).unwrap_or_default(),
        user_email: row.get(2).unwrap_or_default(),
        post_id: row.get(3).unwrap_or_default(),
        created_at: parse_timestamp(&created_str),
    }
}

fn row_to_friend(row: &duckdb::Row) -> Friend {
    // Columns: 0 friend_id, 1 requester_email, 2 friend_email, 3 created_at
    let created_str: String = row.get(3).unwrap_or_default();
    Friend {
        id: row.get(0).unwrap_or_default(),
        requester_email: row.get(1).unwrap_or_default(),
        friend_email: row.get(2).unwrap_or_default(),
        created_at: parse_timestamp(&created_str),
    }
}

fn row_to_user(row: &duckdb::Row) -> User {
    let created_str: String = row.get(1).unwrap_or_default();
    User {
        email: row.get(0).unwrap_or_default(),
        created_at: parse_timestamp(&created_str),
    }
}

// Helper functions

/// Timestamp storage format: fixed-width UTC, so lexicographic order in the
/// database equals chronological order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let stored = format_timestamp(&now);
        let parsed = parse_timestamp(&stored);
        // Stored with microsecond precision
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn test_timestamp_lexicographic_order() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::milliseconds(5);
        assert!(format_timestamp(&earlier) < format_timestamp(&later));
    }

    #[test]
    fn test_lookup_distinguishes_absent_row_from_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DuckDbRepository::new(&dir.path().join("test.duckdb")).unwrap();
        repo.ensure_schema().unwrap();

        // Absent rows are Ok(None)
        assert!(repo.get_post_by_id(1).unwrap().is_none());
        assert!(repo.get_comment_by_id(1).unwrap().is_none());
        assert!(repo.get_friend_by_id(1).unwrap().is_none());

        // A broken store surfaces as Database, never as a silent None
        repo.conn
            .lock()
            .unwrap()
            .execute_batch("DROP TABLE posts; DROP TABLE comments; DROP TABLE friends;")
            .unwrap();
        assert!(matches!(repo.get_post_by_id(1), Err(Error::Database(_))));
        assert!(matches!(repo.get_comment_by_id(1), Err(Error::Database(_))));
        assert!(matches!(repo.get_friend_by_id(1), Err(Error::Database(_))));
    }

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(is_retryable_error("Resource temporarily unavailable"));
        assert!(!is_retryable_error("Catalog Error: table missing"));
    }
}
