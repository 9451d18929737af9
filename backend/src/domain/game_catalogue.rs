//! Game catalogue domain service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{GameCatalogue, GamePersistenceError, GameRepository};
use crate::domain::{Error, Game, GameId, NewGame};

/// Catalogue service implementing [`GameCatalogue`].
#[derive(Clone)]
pub struct GameCatalogueService<R> {
    repo: Arc<R>,
}

impl<R> GameCatalogueService<R> {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_persistence_error(error: GamePersistenceError) -> Error {
    match error {
        GamePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("game repository unavailable: {message}"))
        }
        GamePersistenceError::Query { message } => {
            Error::internal(format!("game repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> GameCatalogue for GameCatalogueService<R>
where
    R: GameRepository,
{
    async fn list_games(&self) -> Result<Vec<Game>, Error> {
        self.repo.list().await.map_err(map_persistence_error)
    }

    async fn add_game(&self, game: NewGame) -> Result<Game, Error> {
        let stored = self
            .repo
            .insert(&game)
            .await
            .map_err(map_persistence_error)?;
        info!(game_id = %stored.id, "game added");
        Ok(stored)
    }

    async fn remove_game(&self, id: GameId) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_persistence_error)? {
            info!(game_id = %id, "game removed");
            Ok(())
        } else {
            Err(Error::not_found(format!("game {id} not found")))
        }
    }
}
