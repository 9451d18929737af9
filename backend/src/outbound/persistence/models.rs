//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use super::schema::{games, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub phone: Option<String>,
    pub favorite_genres: Vec<String>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
    pub phone: Option<&'a str>,
    pub favorite_genres: &'a [String],
}

/// Changeset for the editable profile fields.
///
/// `treat_none_as_null` lets a cleared phone overwrite the stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileChangeset<'a> {
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
}

/// Row struct for reading from the games table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameRow {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub price: f64,
    pub description: Option<String>,
}

/// Insertable struct for catalogue additions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = games)]
pub(crate) struct NewGameRow<'a> {
    pub title: &'a str,
    pub genre: &'a str,
    pub price: f64,
    pub description: Option<&'a str>,
}
