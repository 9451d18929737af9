//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    GameCatalogue, LoginService, UserProfileCommand, UserRegistration, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration use-case.
    pub registration: Arc<dyn UserRegistration>,
    /// Credential check.
    pub login: Arc<dyn LoginService>,
    /// User listing.
    pub users: Arc<dyn UsersQuery>,
    /// Profile edits.
    pub profiles: Arc<dyn UserProfileCommand>,
    /// Game catalogue reads and edits.
    pub games: Arc<dyn GameCatalogue>,
}

impl HttpState {
    /// Wire every user port to one service value.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use backend::domain::{GameCatalogueService, UserAccountService};
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::{InMemoryGameRepository, InMemoryUserRepository};
    ///
    /// let accounts = Arc::new(UserAccountService::new(Arc::new(InMemoryUserRepository::new())));
    /// let games = Arc::new(GameCatalogueService::new(Arc::new(InMemoryGameRepository::new())));
    /// let _state = HttpState::from_services(accounts, games);
    /// ```
    pub fn from_services<U, G>(accounts: Arc<U>, games: Arc<G>) -> Self
    where
        U: UserRegistration + LoginService + UsersQuery + UserProfileCommand + 'static,
        G: GameCatalogue + 'static,
    {
        Self {
            registration: accounts.clone(),
            login: accounts.clone(),
            users: accounts.clone(),
            profiles: accounts,
            games,
        }
    }
}
