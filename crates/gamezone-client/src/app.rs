//! App shell wiring the session, the catalogue and navigation together.

use std::sync::Arc;

use tracing::debug;

use crate::error::ClientError;
use crate::gateway::{GameGateway, UserGateway};
use crate::navigation::{AppScreen, BackStack, NavigationEvent};
use crate::session::SessionContext;
use crate::settings::ClientSettings;
use crate::store::SessionStore;

/// Everything a screen controller needs, created once at launch.
pub struct ClientApp {
    session: SessionContext,
    games: Arc<dyn GameGateway>,
    back_stack: BackStack,
}

impl ClientApp {
    /// Connect to the configured service and restore the persisted session.
    ///
    /// # Errors
    ///
    /// Propagates configuration and store failures.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        let gateway = Arc::new(settings.gateway()?);
        let store = settings.session_store()?;
        Self::with_parts(gateway.clone(), gateway, store)
    }

    /// Assemble from explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] when the store cannot be read.
    pub fn with_parts(
        users: Arc<dyn UserGateway>,
        games: Arc<dyn GameGateway>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        let session = SessionContext::restore(users, store)?;
        let back_stack = BackStack::new(session.start_route());
        Ok(Self {
            session,
            games,
            back_stack,
        })
    }

    /// Session shared with every screen.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Catalogue gateway for the home screen.
    pub fn games(&self) -> &dyn GameGateway {
        self.games.as_ref()
    }

    /// Visible screen.
    pub fn current_screen(&self) -> Option<AppScreen> {
        self.back_stack.current()
    }

    /// Screen history.
    pub fn back_stack(&self) -> &BackStack {
        &self.back_stack
    }

    /// Apply a navigation event emitted by a controller.
    pub fn navigate(&mut self, event: NavigationEvent) {
        if self.back_stack.apply(event) {
            debug!(screen = ?self.back_stack.current(), "navigated");
        }
    }

    /// Log out and leave the authenticated screens behind.
    pub fn logout(&mut self) {
        let event = self.session.logout();
        self.navigate(event);
    }
}
