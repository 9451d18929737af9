//! Port abstraction for game catalogue persistence.

use async_trait::async_trait;

use crate::domain::{Game, GameId, NewGame};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by game repository adapters.
    pub enum GamePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "game repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "game repository query failed: {message}",
    }
}

/// Driven port for storing catalogue entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Every stored game, ordered by identifier.
    async fn list(&self) -> Result<Vec<Game>, GamePersistenceError>;

    /// Insert a game and return it with its assigned identifier.
    async fn insert(&self, game: &NewGame) -> Result<Game, GamePersistenceError>;

    /// Delete a game. Returns `false` when no row had that identifier.
    async fn delete(&self, id: GameId) -> Result<bool, GamePersistenceError>;
}
