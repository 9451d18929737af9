//! Error types for the GameZone client.
//!
//! Every remote or storage failure is converted into a [`ClientError`] value
//! at the call site; nothing is retried.

use std::path::PathBuf;

use backend::domain::LoginValidationError;
use backend::domain::validation::FieldErrors;
use thiserror::Error;

/// Failures surfaced to screens.
#[derive(Debug, Error)]
pub enum ClientError {
    /// One or more fields failed local validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Email or password left blank on the login form.
    #[error("{0}")]
    BlankCredentials(LoginValidationError),

    /// The email and password did not match an account.
    ///
    /// Unknown emails and wrong passwords share this variant.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration hit an email that already has an account.
    #[error("email already registered")]
    EmailAlreadyRegistered,

    /// The server could not be reached or the response was unreadable.
    #[error("server unreachable: {message}")]
    Connectivity {
        /// Transport error description.
        message: String,
    },

    /// The server answered with an error payload.
    #[error("server rejected the request ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the error payload.
        message: String,
        /// Correlation identifier echoed by the server, if any.
        trace_id: Option<String>,
    },

    /// Another session transition is still in flight.
    #[error("another request is still in progress")]
    Busy,

    /// The operation needs a logged-in user.
    #[error("no user is logged in")]
    NotLoggedIn,

    /// Reading or writing the local session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Client settings could not be turned into a working configuration.
    #[error("invalid client configuration: {message}")]
    Configuration {
        /// What was wrong.
        message: String,
    },
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Failures of the persisted session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store file or directory could not be read or opened.
    #[error("failed to read session store at '{path}': {message}")]
    Read {
        /// Store location.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The store could not be written.
    #[error("failed to write session store at '{path}': {message}")]
    Write {
        /// Store location.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The stored document is not valid JSON for the session record.
    #[error("invalid session store JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },
}
