//! Game catalogue records.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    FieldErrors, validate_description, validate_game_genre, validate_game_title, validate_price,
};

/// Numeric game identifier assigned by the repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct GameId(i64);

impl GameId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalogue entry as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Identifier.
    #[schema(value_type = i64, example = 1)]
    pub id: GameId,
    /// Title, at most 150 characters.
    #[schema(example = "Hollow Knight")]
    pub title: String,
    /// Genre label, at most 50 characters.
    #[schema(example = "Aventura")]
    pub genre: String,
    /// Price in the store currency.
    #[schema(example = 14.99)]
    pub price: f64,
    /// Optional blurb, at most 500 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Game fields that passed validation, awaiting an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    title: String,
    genre: String,
    price: f64,
    description: Option<String>,
}

impl NewGame {
    /// Validate raw game fields, collecting every failure.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::NewGame;
    ///
    /// assert!(NewGame::try_new("Celeste", "Aventura", 19.99, None).is_ok());
    /// assert!(NewGame::try_new("", "Aventura", -1.0, None).is_err());
    /// ```
    pub fn try_new(
        title: &str,
        genre: &str,
        price: f64,
        description: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(validate_game_title(title));
        errors.check(validate_game_genre(genre));
        errors.check(validate_price(price));
        errors.check(validate_description(description));
        errors.into_result()?;

        Ok(Self {
            title: title.to_owned(),
            genre: genre.to_owned(),
            price,
            description: description.map(str::to_owned),
        })
    }

    /// Title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Genre label.
    pub fn genre(&self) -> &str {
        self.genre.as_str()
    }

    /// Price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Attach the repository-assigned identifier.
    pub fn into_game(self, id: GameId) -> Game {
        Game {
            id,
            title: self.title,
            genre: self.genre,
            price: self.price,
            description: self.description,
        }
    }
}
