//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, UserProfile};

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return every registered user without passwords.
    async fn list_users(&self) -> Result<Vec<UserProfile>, Error>;
}
