//! In-memory repositories.
//!
//! Used when no database URL is configured and by handler tests. State lives
//! behind a `tokio::sync::RwLock`; identifiers are assigned sequentially from 1.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    GamePersistenceError, GameRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Game, GameId, NewGame, NewUser, ProfileUpdate, User, UserId};

#[derive(Debug)]
struct Table<K, V> {
    next_id: i64,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<K, V> Table<K, V> {
    fn allocate(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Process-local [`UserRepository`].
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|row| row.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        let id = UserId::new(table.allocate());
        let stored = user.clone().into_user(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|row| row.email() == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|row| {
            row.apply_profile_update(update);
            row.clone()
        }))
    }
}

/// Process-local [`GameRepository`].
#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    table: RwLock<Table<GameId, Game>>,
}

impl InMemoryGameRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn list(&self) -> Result<Vec<Game>, GamePersistenceError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn insert(&self, game: &NewGame) -> Result<Game, GamePersistenceError> {
        let mut table = self.table.write().await;
        let id = GameId::new(table.allocate());
        let stored = game.clone().into_game(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: GameId) -> Result<bool, GamePersistenceError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
