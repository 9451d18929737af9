//! GameZone client state.
//!
//! Screen controllers for the GameZone app, free of any UI toolkit: an
//! explicitly passed [`SessionContext`] backed by a persisted
//! [`SessionStore`], the profile edit state machine, the registration form
//! with its debounced email check, navigation history and the catalogue
//! list. Remote calls go through [`UserGateway`] and [`GameGateway`], with
//! [`HttpGateway`] talking to the GameZone service.

pub mod app;
mod atomic_io;
pub mod error;
pub mod gateway;
pub mod home;
pub mod navigation;
pub mod profile;
pub mod register_form;
pub mod session;
pub mod settings;
pub mod store;

pub use app::ClientApp;
pub use error::{ClientError, StoreError};
pub use gateway::{GameGateway, HttpGateway, UserGateway};
pub use home::HomeScreen;
pub use navigation::{AppScreen, BackStack, NavigationEvent};
pub use profile::{ProfileEditBuffer, ProfileEditor, ProfileMode};
pub use register_form::{AVAILABLE_GENRES, EMAIL_CHECK_DEBOUNCE, RegisterForm, RegisterFormState};
pub use session::{RegistrationCandidate, SessionContext, SessionPhase, SessionSnapshot};
pub use settings::ClientSettings;
pub use store::{FileSessionStore, MemorySessionStore, SessionRecord, SessionStore};
