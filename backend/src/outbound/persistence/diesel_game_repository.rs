//! PostgreSQL-backed `GameRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GamePersistenceError, GameRepository};
use crate::domain::{Game, GameId, NewGame};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{GameRow, NewGameRow};
use super::pool::{DbPool, PoolError};
use super::schema::games;

/// Diesel-backed implementation of the `GameRepository` port.
#[derive(Clone)]
pub struct DieselGameRepository {
    pool: DbPool,
}

impl DieselGameRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GamePersistenceError {
    map_basic_pool_error(error, GamePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GamePersistenceError {
    map_basic_diesel_error(
        error,
        GamePersistenceError::query,
        GamePersistenceError::connection,
    )
}

fn row_to_game(row: GameRow) -> Game {
    Game {
        id: GameId::new(row.id),
        title: row.title,
        genre: row.genre,
        price: row.price,
        description: row.description,
    }
}

#[async_trait]
impl GameRepository for DieselGameRepository {
    async fn list(&self) -> Result<Vec<Game>, GamePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GameRow> = games::table
            .order(games::id.asc())
            .select(GameRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_game).collect())
    }

    async fn insert(&self, game: &NewGame) -> Result<Game, GamePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewGameRow {
            title: game.title(),
            genre: game.genre(),
            price: game.price(),
            description: game.description(),
        };

        diesel::insert_into(games::table)
            .values(&row)
            .returning(GameRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(row_to_game)
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: GameId) -> Result<bool, GamePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(games::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
