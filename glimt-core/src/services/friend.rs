//! Friend service - one-directional friend relationships

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{Friend, User};
use crate::services::require_login;

/// The friends view: users the caller can still add, plus current friends
#[derive(Debug, Serialize)]
pub struct FriendsOverview {
    /// Registered users the caller has not friended yet
    pub users: Vec<User>,
    /// The caller's outgoing friendship rows
    pub friends: Vec<Friend>,
}

/// Friend service
pub struct FriendService {
    repository: Arc<DuckDbRepository>,
}

impl FriendService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// All other users split into not-yet-friends and current friends
    pub fn friends_overview(&self, identity: Option<&str>) -> Result<FriendsOverview> {
        let user_email = require_login(identity)?;

        let all_users = self.repository.get_users_except(user_email)?;
        let friends = self.repository.get_friends(user_email)?;

        let users = all_users
            .into_iter()
            .filter(|u| !friends.iter().any(|f| f.friend_email == u.email))
            .collect();

        Ok(FriendsOverview { users, friends })
    }

    /// Add a friend for the caller. Idempotent: an existing
    /// (caller, target) pair inserts nothing.
    pub fn add_friend(&self, identity: Option<&str>, friend_email: &str) -> Result<()> {
        let user_email = require_login(identity)?;

        if friend_email.trim().is_empty() {
            return Err(Error::validation("Friend email cannot be empty."));
        }

        let already_friends = self
            .repository
            .get_friends(user_email)?
            .iter()
            .any(|f| f.friend_email == friend_email);

        if !already_friends {
            self.repository
                .add_friend(&Friend::new(user_email, friend_email))?;
        }

        Ok(())
    }

    /// Remove a friendship row by id.
    ///
    /// The caller must be the requester of the row; removing someone else's
    /// friendship is forbidden.
    pub fn remove_friend(&self, identity: Option<&str>, id: i64) -> Result<()> {
        let user_email = require_login(identity)?;

        let friend = self
            .repository
            .get_friend_by_id(id)?
            .ok_or_else(|| Error::not_found(format!("friendship {}", id)))?;

        if friend.requester_email != user_email {
            return Err(Error::forbidden(
                "You are not authorized to remove this friendship.",
            ));
        }

        self.repository.remove_friend(id)
    }
}
