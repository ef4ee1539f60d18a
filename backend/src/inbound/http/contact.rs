//! Contact form API handler.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{ContactMessage, ContactValidationError, Error, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Contact request body for `POST /api/v1/contact`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// Sender's name.
    pub name: String,
    /// Sender's email address.
    pub email: String,
    /// Sender's phone number.
    pub phone_number: String,
    /// Free-text inquiry body.
    pub message: String,
}

impl TryFrom<ContactRequest> for ContactMessage {
    type Error = ContactValidationError;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.phone_number, &value.message)
    }
}

fn field_for(err: &ContactValidationError) -> &'static str {
    match err {
        ContactValidationError::EmptyName | ContactValidationError::NameTooLong { .. } => "name",
        ContactValidationError::EmptyMessage | ContactValidationError::MessageTooLong { .. } => {
            "message"
        }
        ContactValidationError::Identity(inner) => match inner {
            UserValidationError::EmptyPhoneNumber
            | UserValidationError::PhoneNumberTooLong { .. }
            | UserValidationError::PhoneNumberInvalid => "phoneNumber",
            _ => "email",
        },
    }
}

/// Archive a contact submission and forward it to the notification channel.
#[utoipa::path(
    post,
    path = "/api/v1/contact",
    request_body = ContactRequest,
    responses(
        (status = 202, description = "Submission accepted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["contact"],
    operation_id = "submitContact",
    security([])
)]
#[post("/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let message = ContactMessage::try_from(payload.into_inner()).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": field_for(&err) }))
    })?;
    state.contact.submit(message).await?;
    Ok(HttpResponse::Accepted().finish())
}
