//! Credential lifecycle API handlers.
//!
//! ```text
//! POST /api/v1/signup   {"username":"alice","password":"pw1","phoneNumber":"555-0100","email":"a@x.com"}
//! POST /api/v1/login    {"username":"alice","password":"pw1"}
//! POST /api/v1/password {"username":"alice","currentPassword":"pw1","newPassword":"pw3"}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{CredentialFlowError, SignupError};
use crate::domain::{
    CredentialValidationError, Error, LoginCredentials, PasswordChange, SignupDetails, User,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Shared user-facing text for both login failure conditions, so the response
/// body does not reveal whether the username exists. `details.code` keeps the
/// conditions distinguishable for the caller.
const LOGIN_FAILED_MESSAGE: &str = "invalid username or password";

/// Signup request body for `POST /api/v1/signup`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Requested unique login name.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Requested unique contact email.
    pub email: String,
}

impl TryFrom<SignupRequest> for SignupDetails {
    type Error = CredentialValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.username,
            &value.password,
            &value.phone_number,
            &value.email,
        )
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Change-password request body for `POST /api/v1/password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Login name.
    pub username: String,
    /// Password the user is currently registered with.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

impl TryFrom<ChangePasswordRequest> for PasswordChange {
    type Error = CredentialValidationError;

    fn try_from(value: ChangePasswordRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.username,
            &value.current_password,
            &value.new_password,
        )
    }
}

/// User representation returned to clients; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Unique login name.
    pub username: String,
    /// Unique contact email.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            phone_number: user.phone().to_string(),
        }
    }
}

fn field_for(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyUsername
        | UserValidationError::UsernameTooLong { .. }
        | UserValidationError::UsernameInvalidCharacters => "username",
        UserValidationError::EmptyEmail
        | UserValidationError::EmailTooLong { .. }
        | UserValidationError::EmailInvalid => "email",
        UserValidationError::EmptyPhoneNumber
        | UserValidationError::PhoneNumberTooLong { .. }
        | UserValidationError::PhoneNumberInvalid => "phoneNumber",
        UserValidationError::EmptyId
        | UserValidationError::InvalidId
        | UserValidationError::EmptyPasswordHash => "id",
    }
}

fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password" }))
        }
        CredentialValidationError::Identity(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": field_for(&inner) })),
    }
}

fn map_signup_error(err: SignupError) -> Error {
    match err {
        SignupError::DuplicateUsername => Error::conflict("username already exists")
            .with_details(json!({ "code": "duplicate_username" })),
        SignupError::DuplicateEmail => Error::conflict("email already exists")
            .with_details(json!({ "code": "duplicate_email" })),
        SignupError::Internal(inner) => inner,
    }
}

fn map_credential_flow_error(err: CredentialFlowError) -> Error {
    match err {
        CredentialFlowError::NotRegistered => Error::unauthorized(LOGIN_FAILED_MESSAGE)
            .with_details(json!({ "code": "not_registered" })),
        CredentialFlowError::InvalidCredentials => Error::unauthorized(LOGIN_FAILED_MESSAGE)
            .with_details(json!({ "code": "invalid_credentials" })),
        CredentialFlowError::Internal(inner) => inner,
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already registered", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let details =
        SignupDetails::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let user = state.auth.signup(details).await.map_err(map_signup_error)?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate user and establish a session.
///
/// Uses the centralised `Error` type so clients get a consistent error schema
/// across all endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unknown user or wrong password", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let user = state
        .auth
        .login(credentials)
        .await
        .map_err(map_credential_flow_error)?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Re-authenticate by current password and replace it.
///
/// No session is required; the flow itself verifies the current password.
#[utoipa::path(
    post,
    path = "/api/v1/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unknown user or wrong password", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "changePassword",
    security([])
)]
#[post("/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let change =
        PasswordChange::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    state
        .auth
        .change_password(change)
        .await
        .map_err(map_credential_flow_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Terminate the current session.
///
/// Safe to call without an active session; logout is idempotent.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared"),
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Return the user bound to the current session.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "No active session", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state
        .credentials
        .find_by_id(&user_id)
        .await
        .map_err(|err| Error::internal(format!("session principal lookup failed: {err}")))?
        .ok_or_else(|| {
            // The session outlived the record it points at; treat as logged out.
            Error::unauthorized("login required")
        })?;
    Ok(web::Json(UserResponse::from(&user)))
}
