//! Builds the HTTP state from either Diesel or in-memory repositories.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use backend::domain::{GameCatalogueService, UserAccountService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{InMemoryGameRepository, InMemoryUserRepository};
use backend::outbound::persistence::{DbPool, DieselGameRepository, DieselUserRepository};

use super::ServerConfig;

fn diesel_state(pool: &DbPool) -> HttpState {
    HttpState::from_services(
        Arc::new(UserAccountService::new(Arc::new(DieselUserRepository::new(
            pool.clone(),
        )))),
        Arc::new(GameCatalogueService::new(Arc::new(DieselGameRepository::new(
            pool.clone(),
        )))),
    )
}

fn memory_state() -> HttpState {
    HttpState::from_services(
        Arc::new(UserAccountService::new(Arc::new(InMemoryUserRepository::new()))),
        Arc::new(GameCatalogueService::new(Arc::new(InMemoryGameRepository::new()))),
    )
}

/// Wire the handler ports, preferring PostgreSQL when a pool is configured.
///
/// The in-memory fallback keeps a single store for every worker so accounts
/// registered through one worker are visible to the others.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_state(pool)
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            memory_state()
        }
    };
    web::Data::new(state)
}
