//! Driving port for creating accounts.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, UserProfile};

/// Domain use-case port for registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Store a validated registration. Duplicate emails yield a conflict.
    async fn register(&self, user: NewUser) -> Result<UserProfile, Error>;
}
