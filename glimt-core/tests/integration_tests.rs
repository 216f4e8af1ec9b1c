//! Integration tests for glimt-core services
//!
//! These tests verify ownership checks, validation, paging, and seeding
//! against a real DuckDB database in a temporary directory.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;
use tempfile::TempDir;

use glimt_core::adapters::duckdb::DuckDbRepository;
use glimt_core::services::{
    CommentService, FriendService, MediaService, NewPostInput, PostService, SeedService,
    StatusService, UpdatePostRequest, FEED_PAGE_SIZE,
};
use glimt_core::{Error, User};

const ALICE: Option<&str> = Some("alice@example.com");
const BOB: Option<&str> = Some("bob@example.com");

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

fn create_post_service(temp_dir: &TempDir, repo: &Arc<DuckDbRepository>) -> PostService {
    let media = MediaService::new(temp_dir.path().join("uploads"));
    PostService::new(Arc::clone(repo), media)
}

fn text_post(content: &str) -> NewPostInput {
    NewPostInput {
        content: Some(content.to_string()),
        image: None,
    }
}

// ============================================================================
// Post Ownership and Validation Tests
// ============================================================================

#[test]
fn test_created_post_appears_in_my_posts() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    let created = posts.create_post(ALICE, text_post("Hello")).unwrap();
    assert_eq!(created.content.as_deref(), Some("Hello"));
    assert_eq!(created.user_email, "alice@example.com");

    let mine = posts.my_posts(ALICE).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, created.id);

    // Bob has no posts
    assert!(posts.my_posts(BOB).unwrap().is_empty());
}

#[test]
fn test_anonymous_caller_cannot_create_post() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    let result = posts.create_post(None, text_post("Hello"));
    assert!(matches!(result, Err(Error::Unauthorized)));
    assert_eq!(posts.feed(None).unwrap().total_posts, 0);
}

#[test]
fn test_post_with_neither_content_nor_image_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    let result = posts.create_post(
        ALICE,
        NewPostInput {
            content: Some("   ".to_string()),
            image: None,
        },
    );
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn test_non_owner_cannot_update_post() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    let created = posts.create_post(ALICE, text_post("Original")).unwrap();

    let result = posts.update_post(
        BOB,
        UpdatePostRequest {
            id: created.id,
            content: "Hijacked".to_string(),
        },
    );
    assert!(matches!(result, Err(Error::Forbidden(_))));

    // Content is unchanged
    let reloaded = posts.edit_post(ALICE, created.id).unwrap();
    assert_eq!(reloaded.content.as_deref(), Some("Original"));
}

#[test]
fn test_owner_can_update_and_delete_post() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    let created = posts.create_post(ALICE, text_post("Original")).unwrap();

    let updated = posts
        .update_post(
            ALICE,
            UpdatePostRequest {
                id: created.id,
                content: "Edited".to_string(),
            },
        )
        .unwrap();
    assert_eq!(updated.content.as_deref(), Some("Edited"));

    posts.delete_post(ALICE, created.id).unwrap();
    assert!(matches!(
        posts.edit_post(ALICE, created.id),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_delete_missing_post_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    assert!(matches!(
        posts.delete_post(ALICE, 999),
        Err(Error::NotFound(_))
    ));
}

// ============================================================================
// Feed Paging Tests
// ============================================================================

#[test]
fn test_feed_pages_are_disjoint_and_cover_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    for i in 0..25 {
        posts.create_post(ALICE, text_post(&format!("Post {}", i))).unwrap();
    }

    let page1 = posts.feed(Some(1)).unwrap();
    let page2 = posts.feed(Some(2)).unwrap();

    assert_eq!(page1.posts.len(), FEED_PAGE_SIZE as usize);
    assert_eq!(page2.posts.len(), FEED_PAGE_SIZE as usize);
    assert_eq!(page1.total_posts, 25);

    let ids1: Vec<i64> = page1.posts.iter().map(|p| p.id).collect();
    let ids2: Vec<i64> = page2.posts.iter().map(|p| p.id).collect();
    assert!(ids1.iter().all(|id| !ids2.contains(id)), "pages overlap");

    // Newest-first within and across pages: ids were assigned in creation
    // order, so every id on page 1 is greater than every id on page 2.
    assert!(ids1.iter().min().unwrap() > ids2.iter().max().unwrap());

    let page3 = posts.feed(Some(3)).unwrap();
    assert_eq!(page3.posts.len(), 5);
}

#[test]
fn test_feed_page_defaults_and_clamps() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    posts.create_post(ALICE, text_post("Only post")).unwrap();

    let default_page = posts.feed(None).unwrap();
    assert_eq!(default_page.page, 1);
    assert_eq!(default_page.posts.len(), 1);

    // Page 0 and negative pages clamp to page 1
    let clamped = posts.feed(Some(0)).unwrap();
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.posts.len(), 1);
}

// ============================================================================
// Comment Tests
// ============================================================================

#[test]
fn test_comment_lifecycle_with_ownership() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);
    let comments = CommentService::new(Arc::clone(&repo));

    let post = posts.create_post(ALICE, text_post("Hello")).unwrap();

    let comment = comments.add_comment(BOB, post.id, "Nice one!").unwrap();
    assert_eq!(comment.user_email, "bob@example.com");
    assert_eq!(comment.post_id, post.id);

    // Alice (not the comment owner) cannot delete or edit Bob's comment
    assert!(matches!(
        comments.delete_comment(ALICE, comment.id),
        Err(Error::Forbidden(_))
    ));
    assert!(matches!(
        comments.edit_comment(ALICE, comment.id, "Changed"),
        Err(Error::Forbidden(_))
    ));

    // Still retrievable and unchanged
    let listed = comments.comments_for_post(post.id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "Nice one!");

    // The owner can edit, then delete
    let edited = comments.edit_comment(BOB, comment.id, "Even nicer!").unwrap();
    assert_eq!(edited.content, "Even nicer!");

    comments.delete_comment(BOB, comment.id).unwrap();
    assert!(comments.comments_for_post(post.id).unwrap().is_empty());
}

#[test]
fn test_comment_on_missing_post_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let comments = CommentService::new(Arc::clone(&repo));

    assert!(matches!(
        comments.add_comment(ALICE, 999, "Hello?"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_delete_missing_comment_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let comments = CommentService::new(Arc::clone(&repo));

    assert!(matches!(
        comments.delete_comment(ALICE, 999),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_blank_comment_is_rejected_before_lookup() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let comments = CommentService::new(Arc::clone(&repo));

    // Blank content on a missing comment reports validation, not absence
    assert!(matches!(
        comments.edit_comment(ALICE, 999, "   "),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_comments_listed_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);
    let comments = CommentService::new(Arc::clone(&repo));

    let post = posts.create_post(ALICE, text_post("Hello")).unwrap();
    let first = comments.add_comment(BOB, post.id, "First").unwrap();
    let second = comments.add_comment(BOB, post.id, "Second").unwrap();

    let listed = comments.comments_for_post(post.id).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

// ============================================================================
// Friend Tests
// ============================================================================

#[test]
fn test_add_friend_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let friends = FriendService::new(Arc::clone(&repo));

    friends.add_friend(ALICE, "bob@example.com").unwrap();
    friends.add_friend(ALICE, "bob@example.com").unwrap();

    let overview = friends.friends_overview(ALICE).unwrap();
    assert_eq!(overview.friends.len(), 1);
    assert_eq!(overview.friends[0].friend_email, "bob@example.com");
}

#[test]
fn test_friendship_is_one_directional() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let friends = FriendService::new(Arc::clone(&repo));

    friends.add_friend(ALICE, "bob@example.com").unwrap();

    // Bob did not friend Alice back
    let bobs = friends.friends_overview(BOB).unwrap();
    assert!(bobs.friends.is_empty());
}

#[test]
fn test_friends_overview_excludes_existing_friends_from_users() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let friends = FriendService::new(Arc::clone(&repo));

    for email in ["alice@example.com", "bob@example.com", "carol@example.com"] {
        repo.upsert_user(&User::new(email)).unwrap();
    }

    friends.add_friend(ALICE, "bob@example.com").unwrap();

    let overview = friends.friends_overview(ALICE).unwrap();
    let emails: Vec<&str> = overview.users.iter().map(|u| u.email.as_str()).collect();
    assert!(emails.contains(&"carol@example.com"));
    assert!(!emails.contains(&"bob@example.com"), "friended user listed");
    assert!(!emails.contains(&"alice@example.com"), "caller listed");
}

#[test]
fn test_only_requester_can_remove_friendship() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let friends = FriendService::new(Arc::clone(&repo));

    friends.add_friend(ALICE, "bob@example.com").unwrap();
    let id = friends.friends_overview(ALICE).unwrap().friends[0].id;

    assert!(matches!(
        friends.remove_friend(BOB, id),
        Err(Error::Forbidden(_))
    ));

    friends.remove_friend(ALICE, id).unwrap();
    assert!(friends.friends_overview(ALICE).unwrap().friends.is_empty());

    // Already removed
    assert!(matches!(
        friends.remove_friend(ALICE, id),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_empty_friend_email_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let friends = FriendService::new(Arc::clone(&repo));

    assert!(matches!(
        friends.add_friend(ALICE, "  "),
        Err(Error::Validation(_))
    ));
}

// ============================================================================
// Status and Seed Tests
// ============================================================================

#[test]
fn test_status_counts_reflect_activity() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);
    let comments = CommentService::new(Arc::clone(&repo));
    let friends = FriendService::new(Arc::clone(&repo));
    let status = StatusService::new(Arc::clone(&repo));

    repo.upsert_user(&User::new("alice@example.com")).unwrap();
    repo.upsert_user(&User::new("bob@example.com")).unwrap();
    let post = posts.create_post(ALICE, text_post("Hello")).unwrap();
    comments.add_comment(BOB, post.id, "Hi!").unwrap();
    friends.add_friend(ALICE, "bob@example.com").unwrap();

    let summary = status.get_status().unwrap();
    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.total_posts, 1);
    assert_eq!(summary.total_comments, 1);
    assert_eq!(summary.total_friendships, 1);
}

#[test]
fn test_seed_populates_fixture_data_once() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    SeedService::seed(&repo).unwrap();
    let users = repo.get_user_count().unwrap();
    let posts = repo.get_post_count().unwrap();
    let comments = repo.get_comment_count().unwrap();
    assert_eq!(users, 6);
    assert_eq!(posts, 4);
    assert_eq!(comments, 2);

    // Seeding again does not duplicate
    SeedService::seed(&repo).unwrap();
    assert_eq!(repo.get_post_count().unwrap(), posts);
    assert_eq!(repo.get_comment_count().unwrap(), comments);

    let all_posts = repo.get_posts().unwrap();
    assert_eq!(all_posts.len() as i64, posts);
    assert!(all_posts.iter().all(|p| p.image_path.is_some()));
}

#[test]
fn test_demo_disable_clean_removes_database() {
    let temp_dir = TempDir::new().unwrap();
    let service = SeedService::new(temp_dir.path());

    service.enable().unwrap();
    assert!(service.is_enabled().unwrap());
    assert!(temp_dir.path().join("demo.duckdb").exists());

    service.disable(true).unwrap();
    assert!(!service.is_enabled().unwrap());
    assert!(!temp_dir.path().join("demo.duckdb").exists());
}

#[test]
fn test_seed_attaches_comments_to_existing_post() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    // Posts already present, comments not: fixture comments must land on a
    // post that actually exists, not a guessed id.
    let existing = posts.create_post(ALICE, text_post("Pre-existing")).unwrap();
    SeedService::seed(&repo).unwrap();

    assert_eq!(repo.get_post_count().unwrap(), 1);
    let comments = repo.get_comments_for_post(existing.id).unwrap();
    assert_eq!(comments.len(), 2);
}

#[test]
fn test_seeded_feed_is_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    SeedService::seed(&repo).unwrap();

    let feed = posts.feed(None).unwrap();
    assert_eq!(feed.posts.len(), 4);
    for pair in feed.posts.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at, "feed out of order");
    }
}

// ============================================================================
// Image Upload Tests
// ============================================================================

#[test]
fn test_image_only_post_is_valid_and_stored() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let posts = create_post_service(&temp_dir, &repo);

    let created = posts
        .create_post(
            ALICE,
            NewPostInput {
                content: None,
                image: Some(glimt_core::services::ImageUpload {
                    file_name: "sunset.jpg".to_string(),
                    bytes: vec![0xFF, 0xD8, 0xFF],
                }),
            },
        )
        .unwrap();

    let image_path = created.image_path.expect("image path missing");
    assert!(image_path.starts_with("/uploads/"));
    assert!(image_path.ends_with("sunset.jpg"));

    // The file exists on disk under the uploads directory
    let media = MediaService::new(temp_dir.path().join("uploads"));
    let file_name = image_path.strip_prefix("/uploads/").unwrap();
    assert!(media.uploads_dir().join(file_name).exists());
}
