//! Users API handlers.
//!
//! ```text
//! GET  /api/users
//! POST /api/users/register {"email":"ana@duoc.cl","fullName":"Ana",...}
//! POST /api/users/login    {"email":"ana@duoc.cl","password":"Secret123!"}
//! PUT  /api/users/{id}     {"fullName":"Ana Maria","phone":"912345678"}
//! ```

use std::collections::BTreeSet;

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::RegistrationDraft;
use crate::domain::{
    Error, LoginCredentials, LoginValidationError, NewUser, ProfileUpdate, UserId, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::UserSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_fields, invalid_login};

/// Registration body for `POST /api/users/register`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Institutional email.
    #[schema(example = "ana.perez@duoc.cl")]
    pub email: String,
    /// Display name, letters and spaces.
    #[schema(example = "Ana Perez")]
    pub full_name: String,
    /// Password meeting the complexity policy.
    #[schema(example = "Secret123!")]
    pub password: String,
    /// Optional phone, 8 to 12 digits.
    #[serde(default)]
    pub phone: Option<String>,
    /// At least one favourite genre.
    #[serde(default, alias = "generos")]
    pub favorite_genres: BTreeSet<String>,
}

impl TryFrom<&RegisterRequest> for NewUser {
    type Error = Error;

    fn try_from(value: &RegisterRequest) -> Result<Self, Self::Error> {
        NewUser::try_from_draft(&RegistrationDraft {
            full_name: &value.full_name,
            email: &value.email,
            password: &value.password,
            phone: value.phone.as_deref(),
            favorite_genres: &value.favorite_genres,
        })
        .map_err(|errors| invalid_fields(&errors))
    }
}

/// Login body for `POST /api/users/login`.
#[derive(Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    #[schema(example = "ana.perez@duoc.cl")]
    pub email: String,
    /// Account password.
    #[schema(example = "Secret123!")]
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Profile edit body for `PUT /api/users/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    /// New display name.
    #[schema(example = "Ana Maria Perez")]
    pub full_name: String,
    /// New phone; omit or leave blank to clear it.
    #[serde(default)]
    pub phone: Option<String>,
}

/// List every registered user. Passwords are never included.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserProfile]),
        (status = 503, description = "Repository unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserProfile),
        (status = 400, description = "Field validation failed", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let new_user = NewUser::try_from(&payload.into_inner())?;
    let profile = state.registration.register(new_user).await?;
    Ok(web::Json(profile))
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: UserSession,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let credentials =
        LoginCredentials::try_from(&payload.into_inner()).map_err(|err| invalid_login(&err))?;
    let profile = state.login.authenticate(&credentials).await?;
    session.sign_in(profile.id)?;
    Ok(web::Json(profile))
}

/// Change the caller's own name and phone.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = ProfileUpdateRequest,
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Field validation failed", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Editing another user's profile", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: UserSession,
    path: web::Path<i64>,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let target = UserId::new(path.into_inner());
    session.require_owner(target)?;

    let body = payload.into_inner();
    let update = ProfileUpdate::try_new(&body.full_name, body.phone.as_deref())
        .map_err(|errors| invalid_fields(&errors))?;
    let profile = state.profiles.update_profile(target, update).await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
mod tests;
