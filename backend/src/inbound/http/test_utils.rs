//! Fixtures shared by the HTTP adapter tests.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::{GameCatalogueService, UserAccountService};
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryGameRepository, InMemoryUserRepository};

/// Cookie session over plain HTTP with a throwaway key.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
    .middleware()
}

/// Account and catalogue services over empty in-memory repositories.
pub fn memory_state() -> HttpState {
    let users = InMemoryUserRepository::new();
    let games = InMemoryGameRepository::new();
    HttpState::from_services(
        Arc::new(UserAccountService::new(Arc::new(users))),
        Arc::new(GameCatalogueService::new(Arc::new(games))),
    )
}

/// The `/api` scope behind a test session, serving `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(super::api_scope().wrap(test_session_middleware()))
}
