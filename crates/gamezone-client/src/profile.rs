//! Profile view/edit state machine.
//!
//! Only the full name and phone are editable. Edits live in a buffer until
//! [`ProfileEditor::save`] commits them through the gateway; a failed save
//! keeps the editor open with the buffer intact.

use backend::domain::UserProfile;
use backend::domain::validation::validate_profile_update;
use backend::inbound::http::users::ProfileUpdateRequest;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::session::SessionContext;

/// Transient copy of the editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEditBuffer {
    /// Display name being edited.
    pub full_name: String,
    /// Phone being edited; blank clears it.
    pub phone: String,
}

impl ProfileEditBuffer {
    fn from_profile(user: &UserProfile) -> Self {
        Self {
            full_name: user.full_name.clone(),
            phone: user.phone.clone().unwrap_or_default(),
        }
    }

    fn to_request(&self) -> ProfileUpdateRequest {
        let phone = self.phone.trim();
        ProfileUpdateRequest {
            full_name: self.full_name.trim().to_owned(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
        }
    }
}

/// Editor mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileMode {
    /// Read-only view.
    #[default]
    Viewing,
    /// Edit form open.
    Editing {
        /// Uncommitted values.
        buffer: ProfileEditBuffer,
    },
}

/// Profile screen controller.
#[derive(Debug, Default)]
pub struct ProfileEditor {
    mode: ProfileMode,
}

impl ProfileEditor {
    /// Start in [`ProfileMode::Viewing`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> &ProfileMode {
        &self.mode
    }

    /// Whether the edit form is open.
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, ProfileMode::Editing { .. })
    }

    /// Open the edit form seeded with the signed-in user's values.
    ///
    /// Re-entering while already editing keeps the current buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] when the session has no profile.
    pub fn enter_edit(&mut self, session: &SessionContext) -> Result<(), ClientError> {
        if self.is_editing() {
            return Ok(());
        }
        let user = session.current_user().ok_or(ClientError::NotLoggedIn)?;
        self.mode = ProfileMode::Editing {
            buffer: ProfileEditBuffer::from_profile(&user),
        };
        Ok(())
    }

    /// Replace the buffered name. Ignored while viewing.
    pub fn set_full_name(&mut self, value: impl Into<String>) {
        if let ProfileMode::Editing { buffer } = &mut self.mode {
            buffer.full_name = value.into();
        }
    }

    /// Replace the buffered phone. Ignored while viewing.
    pub fn set_phone(&mut self, value: impl Into<String>) {
        if let ProfileMode::Editing { buffer } = &mut self.mode {
            buffer.phone = value.into();
        }
    }

    /// Discard the buffer and return to viewing.
    pub fn cancel(&mut self) {
        self.mode = ProfileMode::Viewing;
    }

    /// Validate and commit the buffer.
    ///
    /// On success the session's profile and display name are updated and the
    /// editor returns to viewing. Returns `Ok(None)` while viewing.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`], [`ClientError::NotLoggedIn`] or the
    /// gateway's error; the editor stays in [`ProfileMode::Editing`].
    pub async fn save(
        &mut self,
        session: &SessionContext,
    ) -> Result<Option<UserProfile>, ClientError> {
        let ProfileMode::Editing { buffer } = &self.mode else {
            return Ok(None);
        };
        validate_profile_update(&buffer.full_name, Some(buffer.phone.as_str()))?;
        let user = session.current_user().ok_or(ClientError::NotLoggedIn)?;

        let updated = session
            .gateway()
            .update_user(user.id, &buffer.to_request())
            .await?;

        if let Err(err) = session.update_display_name(&updated.full_name) {
            warn!(error = %err, "failed to persist updated display name");
        }
        session.replace_user(updated.clone());
        self.mode = ProfileMode::Viewing;
        info!(user_id = %updated.id, "profile saved");
        Ok(Some(updated))
    }
}
