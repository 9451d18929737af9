//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod game_catalogue;
mod game_repository;
mod login_service;
mod user_profile_command;
mod user_registration;
mod user_repository;
mod users_query;

pub use game_catalogue::GameCatalogue;
#[cfg(test)]
pub use game_catalogue::MockGameCatalogue;
pub use game_repository::{GamePersistenceError, GameRepository};
#[cfg(test)]
pub use game_repository::MockGameRepository;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use user_profile_command::UserProfileCommand;
#[cfg(test)]
pub use user_profile_command::MockUserProfileCommand;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use user_registration::MockUserRegistration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_query::UsersQuery;
#[cfg(test)]
pub use users_query::MockUsersQuery;
