//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the validation rules they obey, and the services implementing the
//! driving ports. Nothing in here depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User, NewUser, UserProfile, ProfileUpdate: account model.
//! - Game, NewGame: catalogue records.
//! - UserAccountService, GameCatalogueService: port implementations.

pub mod auth;
pub mod error;
pub mod game;
pub mod game_catalogue;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_accounts;
pub mod validation;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::game::{Game, GameId, NewGame};
pub use self::game_catalogue::GameCatalogueService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, Password, ProfileUpdate, User, UserId, UserProfile};
pub use self::user_accounts::{INVALID_CREDENTIALS, UserAccountService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
