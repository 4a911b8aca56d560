//! Account handlers under `/api/auth`.
//!
//! ```text
//! POST /api/auth/register {"name":"Ada","email":"ada@example.com","password":"secret1","phone":"123"}
//! POST /api/auth/login {"email":"ada@example.com","password":"secret1"}
//! GET /api/auth/me
//! PUT /api/auth/training {"videoId":2,"trainingProgress":2}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AuthSession;
use crate::domain::{
    Error, ErrorBody, LoginCredentials, ProgressUpdate, Registration, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::body::JsonOrEmpty;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "secret1")]
    pub password: Option<String>,
    #[schema(example = "+44 20 7946 0000")]
    pub phone: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = String;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.name.as_deref(),
            value.email.as_deref(),
            value.password.as_deref(),
            value.phone.as_deref(),
        )
    }
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "secret1")]
    pub password: Option<String>,
}

/// Successful registration or login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserProfile,
    pub token: String,
    #[schema(example = "7d")]
    pub expires_in: String,
}

impl AuthResponse {
    fn new(session: AuthSession, expires_in: &str) -> Self {
        Self {
            success: true,
            user: session.user,
            token: session.token,
            expires_in: expires_in.to_owned(),
        }
    }
}

/// Envelope wrapping a single profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

impl From<UserProfile> for ProfileResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Register a hunter account and issue a token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failure or duplicate email", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(Error::invalid_request)?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new(session, &state.expires_in)))
}

/// Exchange credentials for a token.
///
/// Unknown emails and wrong passwords produce the same response.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(|err| Error::invalid_request(err.to_string()))?;
    let session = state.accounts.authenticate(&credentials).await?;
    Ok(web::Json(AuthResponse::new(session, &state.expires_in)))
}

/// Current caller's profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state.accounts.profile(identity.id()).await?;
    Ok(web::Json(profile.into()))
}

/// Record training, quiz or access progress for the caller.
#[utoipa::path(
    put,
    path = "/api/auth/training",
    request_body = ProgressUpdate,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "updateTrainingProgress"
)]
#[put("/training")]
pub async fn update_training(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: JsonOrEmpty<ProgressUpdate>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state
        .accounts
        .update_progress(identity.id(), &payload)
        .await?;
    Ok(web::Json(profile.into()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
