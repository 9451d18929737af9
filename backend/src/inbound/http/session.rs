//! Signed-in user tracking on top of the actix cookie session.
//!
//! Handlers take a [`UserSession`] extractor instead of the raw session so
//! the key name and the ownership rule for profile edits live in one place.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::{Error, UserId};

const USER_ID_KEY: &str = "user_id";

/// The caller's session.
#[derive(Clone)]
pub struct UserSession(Session);

impl UserSession {
    /// Record `user_id` as signed in. The session is renewed first so a
    /// cookie issued before login cannot be replayed afterwards.
    pub fn sign_in(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Signed-in user, if any. A malformed value counts as signed out.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(id) => id.map(UserId::new),
            Err(error) => {
                warn!(%error, "ignoring malformed user id in session cookie");
                None
            }
        }
    }

    /// Allow the call only when `target` is the signed-in user.
    ///
    /// # Errors
    ///
    /// `401` without a signed-in user, `403` for anyone else's account.
    pub fn require_owner(&self, target: UserId) -> Result<UserId, Error> {
        let caller = self
            .user_id()
            .ok_or_else(|| Error::unauthorized("login required"))?;
        if caller != target {
            debug!(%caller, %target, "refusing access to another account");
            return Err(Error::forbidden("cannot edit another user's profile"));
        }
        Ok(caller)
    }
}

impl FromRequest for UserSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(UserSession) })
    }
}
