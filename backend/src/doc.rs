//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every HTTP endpoint from the inbound layer, the shared
//! error envelope, and the session cookie security scheme. The generated
//! specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::contact::ContactRequest;
use crate::inbound::http::predictions::{PredictionRequest, PredictionResponse};
use crate::inbound::http::users::{
    ChangePasswordRequest, LoginRequest, SignupRequest, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
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
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Screening portal backend API",
        description = "HTTP interface for signup, session login, contact intake, and risk predictions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::contact::submit_contact,
        crate::inbound::http::predictions::predict,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        ChangePasswordRequest,
        UserResponse,
        ContactRequest,
        PredictionRequest,
        PredictionResponse,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "users", description = "Credential lifecycle and session operations"),
        (name = "contact", description = "Contact-form intake"),
        (name = "predictions", description = "Risk classifier evaluation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
