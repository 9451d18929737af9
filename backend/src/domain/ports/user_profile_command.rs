//! Driving port for editing the mutable profile fields.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, UserId, UserProfile};

/// Domain use-case port for profile edits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Update name and phone. Unknown ids yield `not_found`.
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error>;
}
