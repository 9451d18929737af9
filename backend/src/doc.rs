//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer, the
//! request/response schemas and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Game, UserProfile};
use crate::inbound::http::games::{CreateGameRequest, DeleteGameResponse};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::users::{LoginRequest, ProfileUpdateRequest, RegisterRequest};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/users/login.",
            ))),
        );
    }
}

/// OpenAPI document for the GameZone REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "GameZone API",
        description = "Accounts and game catalogue for the GameZone student store."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::update_user,
        crate::inbound::http::games::list_games,
        crate::inbound::http::games::create_game,
        crate::inbound::http::games::delete_game,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserProfile,
        Game,
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        ProfileUpdateRequest,
        CreateGameRequest,
        DeleteGameResponse,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "Registration, login and profiles"),
        (name = "games", description = "Game catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
