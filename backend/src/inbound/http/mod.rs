//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod games;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// The `/api` scope with JSON and path extractors configured to answer with
/// the domain error payload.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::list_users)
        .service(users::register)
        .service(users::login)
        .service(users::update_user)
        .service(games::list_games)
        .service(games::create_game)
        .service(games::delete_game)
}
