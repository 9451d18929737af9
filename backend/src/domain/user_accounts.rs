//! Account domain service.
//!
//! Implements registration, login, listing and profile edits on top of a
//! [`UserRepository`]. Persistence failures are mapped to domain errors here
//! so inbound adapters only ever see [`Error`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    LoginService, UserPersistenceError, UserProfileCommand, UserRegistration, UserRepository,
    UsersQuery,
};
use crate::domain::validation::{FieldError, FieldErrors};
use crate::domain::{Error, LoginCredentials, NewUser, ProfileUpdate, UserId, UserProfile};

/// Message returned for every failed login.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing the user-facing driving ports.
#[derive(Clone)]
pub struct UserAccountService<R> {
    repo: Arc<R>,
}

impl<R> UserAccountService<R> {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => email_conflict(),
    }
}

fn email_conflict() -> Error {
    Error::conflict("email already registered")
        .with_details(FieldErrors::from(FieldError::EmailAlreadyRegistered).to_details())
}

#[async_trait]
impl<R> UserRegistration for UserAccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, user: NewUser) -> Result<UserProfile, Error> {
        if self
            .repo
            .find_by_email(user.email())
            .await
            .map_err(map_persistence_error)?
            .is_some()
        {
            debug!("registration rejected: email taken");
            return Err(email_conflict());
        }

        let stored = self
            .repo
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %stored.id(), "user registered");
        Ok(stored.profile())
    }
}

#[async_trait]
impl<R> LoginService for UserAccountService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error> {
        let found = self
            .repo
            .find_by_email(credentials.email())
            .await
            .map_err(map_persistence_error)?;

        match found {
            Some(user) if user.password().matches(credentials.password()) => {
                info!(user_id = %user.id(), "login succeeded");
                Ok(user.profile())
            }
            _ => {
                debug!("login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UserAccountService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<UserProfile>, Error> {
        let users = self.repo.list().await.map_err(map_persistence_error)?;
        Ok(users.iter().map(|user| user.profile()).collect())
    }
}

#[async_trait]
impl<R> UserProfileCommand for UserAccountService<R>
where
    R: UserRepository,
{
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error> {
        let updated = self
            .repo
            .update_profile(id, &update)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        info!(user_id = %id, "profile updated");
        Ok(updated.profile())
    }
}
