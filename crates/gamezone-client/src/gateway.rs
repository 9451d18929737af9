//! Gateways to the GameZone REST service.
//!
//! [`UserGateway`] and [`GameGateway`] are the seams the session holder and
//! screens talk to. [`HttpGateway`] implements both over `reqwest`, keeping
//! the session cookie between calls and sending a fresh `trace-id` header
//! with every request.

use std::time::Duration;

use async_trait::async_trait;
use backend::domain::{
    Error as ApiError, Game, GameId, TRACE_ID_HEADER, TraceId, UserId, UserProfile,
};
use backend::inbound::http::games::{CreateGameRequest, DeleteGameResponse};
use backend::inbound::http::users::{LoginRequest, ProfileUpdateRequest, RegisterRequest};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

/// Account operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Create an account.
    ///
    /// Reports [`ClientError::EmailAlreadyRegistered`] on a duplicate email.
    async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ClientError>;

    /// Check credentials and start a server session.
    ///
    /// Reports [`ClientError::InvalidCredentials`] for any mismatch.
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError>;

    /// Replace the signed-in user's name and phone.
    async fn update_user(
        &self,
        id: UserId,
        update: &ProfileUpdateRequest,
    ) -> Result<UserProfile, ClientError>;

    /// Every registered account.
    async fn list_users(&self) -> Result<Vec<UserProfile>, ClientError>;

    /// Whether an account already uses `email`.
    async fn email_registered(&self, email: &str) -> Result<bool, ClientError>;
}

/// Catalogue operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameGateway: Send + Sync {
    /// Every game in the catalogue.
    async fn list_games(&self) -> Result<Vec<Game>, ClientError>;

    /// Add a game.
    async fn add_game(&self, request: &CreateGameRequest) -> Result<Game, ClientError>;

    /// Remove a game by identifier.
    async fn remove_game(&self, id: GameId) -> Result<(), ClientError>;
}

/// `reqwest`-backed implementation of both gateways.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    /// Build a gateway for the service rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connectivity`] when the HTTP client cannot be
    /// constructed.
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, ClientError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;
        Ok(Self { client, base })
    }

    /// Root URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base.join(path).map_err(|err| ClientError::Connectivity {
            message: format!("invalid request URL '{path}': {err}"),
        })?;
        let trace_id = TraceId::generate();
        debug!(%trace_id, %method, %url, "sending request");
        Ok(self
            .client
            .request(method, url)
            .header(TRACE_ID_HEADER, trace_id.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|err| ClientError::Connectivity {
            message: format!("unreadable response body: {err}"),
        })
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(method, path)?.json(body)).await
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    ClientError::Connectivity {
        message: err.to_string(),
    }
}

/// Convert a non-success response into [`ClientError::Server`].
///
/// Bodies that are not a well-formed error payload fall back to the status
/// reason phrase.
fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ApiError>(body) {
        Ok(payload) => ClientError::Server {
            status: status.as_u16(),
            message: payload.message().to_owned(),
            trace_id: payload.trace_id().map(str::to_owned),
        },
        Err(_) => ClientError::Server {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_owned(),
            trace_id: None,
        },
    }
}

fn refine(err: ClientError, status: StatusCode, replacement: ClientError) -> ClientError {
    match err {
        ClientError::Server { status: code, .. } if code == status.as_u16() => replacement,
        other => other,
    }
}

#[async_trait]
impl UserGateway for HttpGateway {
    async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ClientError> {
        self.send_json(Method::POST, "api/users/register", request)
            .await
            .map_err(|err| refine(err, StatusCode::CONFLICT, ClientError::EmailAlreadyRegistered))
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.send_json(Method::POST, "api/users/login", &body)
            .await
            .map_err(|err| refine(err, StatusCode::UNAUTHORIZED, ClientError::InvalidCredentials))
    }

    async fn update_user(
        &self,
        id: UserId,
        update: &ProfileUpdateRequest,
    ) -> Result<UserProfile, ClientError> {
        self.send_json(Method::PUT, &format!("api/users/{id}"), update)
            .await
            .map_err(|err| refine(err, StatusCode::UNAUTHORIZED, ClientError::NotLoggedIn))
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, ClientError> {
        self.send(self.request(Method::GET, "api/users")?).await
    }

    async fn email_registered(&self, email: &str) -> Result<bool, ClientError> {
        let wanted = email.trim();
        let users = self.list_users().await?;
        Ok(users.iter().any(|user| user.email == wanted))
    }
}

#[async_trait]
impl GameGateway for HttpGateway {
    async fn list_games(&self) -> Result<Vec<Game>, ClientError> {
        self.send(self.request(Method::GET, "api/games")?).await
    }

    async fn add_game(&self, request: &CreateGameRequest) -> Result<Game, ClientError> {
        self.send_json(Method::POST, "api/games", request).await
    }

    async fn remove_game(&self, id: GameId) -> Result<(), ClientError> {
        let _: DeleteGameResponse = self
            .send(self.request(Method::DELETE, &format!("api/games/{id}"))?)
            .await?;
        Ok(())
    }
}
