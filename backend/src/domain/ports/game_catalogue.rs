//! Driving port for the game catalogue endpoints.

use async_trait::async_trait;

use crate::domain::{Error, Game, GameId, NewGame};

/// Domain use-case port for catalogue reads and edits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameCatalogue: Send + Sync {
    /// Every game in the catalogue.
    async fn list_games(&self) -> Result<Vec<Game>, Error>;

    /// Add a validated game.
    async fn add_game(&self, game: NewGame) -> Result<Game, Error>;

    /// Remove a game. Unknown ids yield `not_found`.
    async fn remove_game(&self, id: GameId) -> Result<(), Error>;
}
