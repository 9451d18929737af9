//! Game catalogue handlers.
//!
//! ```text
//! GET    /api/games
//! POST   /api/games {"title":"Celeste","genre":"Aventura","price":19.99}
//! DELETE /api/games/{id}
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Game, GameId, NewGame};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::invalid_fields;

/// Body for `POST /api/games`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Title.
    #[schema(example = "Celeste")]
    pub title: String,
    /// Genre label.
    #[schema(example = "Aventura")]
    pub genre: String,
    /// Price, finite and non-negative.
    #[schema(example = 19.99)]
    pub price: f64,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
}

/// Confirmation body returned by `DELETE /api/games/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DeleteGameResponse {
    /// Human-readable confirmation.
    #[schema(example = "game 3 deleted")]
    pub message: String,
}

/// List every game.
#[utoipa::path(
    get,
    path = "/api/games",
    responses(
        (status = 200, description = "Games", body = [Game]),
        (status = 503, description = "Repository unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["games"],
    operation_id = "listGames",
    security([])
)]
#[get("/games")]
pub async fn list_games(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Game>>> {
    Ok(web::Json(state.games.list_games().await?))
}

/// Add a game to the catalogue.
#[utoipa::path(
    post,
    path = "/api/games",
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = Game),
        (status = 400, description = "Field validation failed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["games"],
    operation_id = "createGame",
    security([])
)]
#[post("/games")]
pub async fn create_game(
    state: web::Data<HttpState>,
    payload: web::Json<CreateGameRequest>,
) -> ApiResult<web::Json<Game>> {
    let body = payload.into_inner();
    let game = NewGame::try_new(
        &body.title,
        &body.genre,
        body.price,
        body.description.as_deref(),
    )
    .map_err(|errors| invalid_fields(&errors))?;
    Ok(web::Json(state.games.add_game(game).await?))
}

/// Remove a game.
#[utoipa::path(
    delete,
    path = "/api/games/{id}",
    params(("id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game deleted", body = DeleteGameResponse),
        (status = 404, description = "Unknown game", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["games"],
    operation_id = "deleteGame",
    security([])
)]
#[delete("/games/{id}")]
pub async fn delete_game(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DeleteGameResponse>> {
    let id = GameId::new(path.into_inner());
    state.games.remove_game(id).await?;
    Ok(web::Json(DeleteGameResponse {
        message: format!("game {id} deleted"),
    }))
}
