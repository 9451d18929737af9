//! Home screen state: the game catalogue.

use backend::domain::{Game, GameId, NewGame};
use backend::inbound::http::games::CreateGameRequest;
use tracing::warn;

use crate::error::ClientError;
use crate::gateway::GameGateway;

/// Catalogue list shown on the home screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeScreen {
    /// Games from the last successful load.
    pub games: Vec<Game>,
    /// A load is in flight.
    pub is_loading: bool,
    /// Banner text for the last failure.
    pub error_message: Option<String>,
}

impl HomeScreen {
    /// Empty screen awaiting the first load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the catalogue.
    ///
    /// A failure keeps the previous list and sets [`Self::error_message`].
    pub async fn refresh(&mut self, gateway: &dyn GameGateway) {
        self.is_loading = true;
        match gateway.list_games().await {
            Ok(games) => {
                self.games = games;
                self.error_message = None;
            }
            Err(err) => {
                warn!(error = %err, "failed to load games");
                self.error_message = Some(err.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Validate and add a game, appending it to the list.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] before any request, or the gateway's error.
    pub async fn add_game(
        &mut self,
        gateway: &dyn GameGateway,
        request: &CreateGameRequest,
    ) -> Result<Game, ClientError> {
        NewGame::try_new(
            &request.title,
            &request.genre,
            request.price,
            request.description.as_deref(),
        )?;
        let game = gateway.add_game(request).await?;
        self.games.push(game.clone());
        Ok(game)
    }

    /// Delete a game and drop it from the list.
    ///
    /// # Errors
    ///
    /// Propagates the gateway's error; the list is left unchanged.
    pub async fn remove_game(
        &mut self,
        gateway: &dyn GameGateway,
        id: GameId,
    ) -> Result<(), ClientError> {
        gateway.remove_game(id).await?;
        self.games.retain(|game| game.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGameGateway;
    use rstest::rstest;

    fn game(id: i64, title: &str) -> Game {
        Game {
            id: GameId::new(id),
            title: title.to_owned(),
            genre: "Aventura".to_owned(),
            price: 9.5,
            description: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn refresh_loads_games() {
        let mut gateway = MockGameGateway::new();
        gateway
            .expect_list_games()
            .returning(|| Ok(vec![game(1, "Celeste"), game(2, "Hades")]));
        let mut screen = HomeScreen::new();

        screen.refresh(&gateway).await;

        assert_eq!(screen.games.len(), 2);
        assert!(!screen.is_loading);
        assert_eq!(screen.error_message, None);
    }

    #[rstest]
    #[tokio::test]
    async fn refresh_failure_keeps_previous_games() {
        let mut gateway = MockGameGateway::new();
        gateway.expect_list_games().returning(|| {
            Err(ClientError::Connectivity {
                message: "connection refused".to_owned(),
            })
        });
        let mut screen = HomeScreen {
            games: vec![game(1, "Celeste")],
            ..HomeScreen::default()
        };

        screen.refresh(&gateway).await;

        assert_eq!(screen.games, vec![game(1, "Celeste")]);
        assert!(
            screen
                .error_message
                .as_deref()
                .is_some_and(|message| message.contains("connection refused"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_game_is_rejected_locally() {
        let mut screen = HomeScreen::new();
        let request = CreateGameRequest {
            title: String::new(),
            genre: "Aventura".to_owned(),
            price: -1.0,
            description: None,
        };

        let err = screen
            .add_game(&MockGameGateway::new(), &request)
            .await
            .expect_err("invalid");

        let ClientError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(screen.games.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn add_then_remove_updates_the_list() {
        let mut gateway = MockGameGateway::new();
        gateway
            .expect_add_game()
            .returning(|request| Ok(game(5, &request.title)));
        gateway
            .expect_remove_game()
            .withf(|id| *id == GameId::new(5))
            .returning(|_| Ok(()));
        let mut screen = HomeScreen::new();
        let request = CreateGameRequest {
            title: "Hades".to_owned(),
            genre: "Acción".to_owned(),
            price: 24.99,
            description: Some("Roguelike".to_owned()),
        };

        let added = screen.add_game(&gateway, &request).await.expect("added");
        assert_eq!(screen.games, vec![added]);

        screen.remove_game(&gateway, GameId::new(5)).await.expect("removed");
        assert!(screen.games.is_empty());
    }
}
