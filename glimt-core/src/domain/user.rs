//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, mirrored from the external identity provider.
///
/// The email is the identity key used for every ownership check; no numeric
/// user id takes part in authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("test@example.com");
        assert_eq!(user.email, "test@example.com");
    }
}
