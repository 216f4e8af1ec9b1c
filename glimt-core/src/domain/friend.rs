//! Friend domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A one-directional friendship row: requester added friend.
///
/// Uniqueness of the (requester, friend) pair is checked before insert,
/// not enforced by a constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friend {
    pub id: i64,
    pub requester_email: String,
    pub friend_email: String,
    pub created_at: DateTime<Utc>,
}

impl Friend {
    pub fn new(requester_email: impl Into<String>, friend_email: impl Into<String>) -> Self {
        Self {
            id: 0,
            requester_email: requester_email.into(),
            friend_email: friend_email.into(),
            created_at: Utc::now(),
        }
    }
}
