//! Contact inquiry model.
//!
//! A submitted inquiry is archived once and forwarded to the notification
//! channel; nothing ever reads it back, so the type is immutable by design.

use std::fmt;

use crate::domain::{EmailAddress, PhoneNumber, UserValidationError};

/// Maximum length accepted for the sender name and the message body.
pub const CONTACT_FIELD_MAX: usize = 220;

/// Validation errors returned by [`ContactMessage::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Sender name was missing or blank once trimmed.
    EmptyName,
    /// Sender name exceeded the storage bound.
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Message body was missing or blank once trimmed.
    EmptyMessage,
    /// Message body exceeded the storage bound.
    MessageTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Email or phone failed shape validation.
    Identity(UserValidationError),
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "contact name must be at most {max} characters")
            }
            Self::EmptyMessage => write!(f, "contact message must not be empty"),
            Self::MessageTooLong { max } => {
                write!(f, "contact message must be at most {max} characters")
            }
            Self::Identity(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ContactValidationError {}

impl From<UserValidationError> for ContactValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Identity(value)
    }
}

fn bounded_text(
    raw: &str,
    empty: ContactValidationError,
    too_long: ContactValidationError,
) -> Result<String, ContactValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > CONTACT_FIELD_MAX {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// A validated contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    name: String,
    email: EmailAddress,
    phone: PhoneNumber,
    message: String,
}

impl ContactMessage {
    /// Construct a contact message from raw form inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> Result<Self, ContactValidationError> {
        Ok(Self {
            name: bounded_text(
                name,
                ContactValidationError::EmptyName,
                ContactValidationError::NameTooLong {
                    max: CONTACT_FIELD_MAX,
                },
            )?,
            email: EmailAddress::new(email)?,
            phone: PhoneNumber::new(phone)?,
            message: bounded_text(
                message,
                ContactValidationError::EmptyMessage,
                ContactValidationError::MessageTooLong {
                    max: CONTACT_FIELD_MAX,
                },
            )?,
        })
    }

    /// Sender's name as provided on the form.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Sender's email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Sender's phone number.
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Free-text inquiry body.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn accepts_and_trims_valid_input() {
        let message =
            ContactMessage::try_from_parts("  Ada  ", "ada@x.com", "555-0100", " hello ")
                .expect("valid contact message");
        assert_eq!(message.name(), "Ada");
        assert_eq!(message.message(), "hello");
    }

    #[rstest]
    #[case("", "a@x.com", "555-0100", "hi", ContactValidationError::EmptyName)]
    #[case("Ada", "a@x.com", "555-0100", "  ", ContactValidationError::EmptyMessage)]
    #[case(
        "Ada",
        "bad",
        "555-0100",
        "hi",
        ContactValidationError::Identity(UserValidationError::EmailInvalid)
    )]
    fn rejects_invalid_input(
        #[case] name: &str,
        #[case] email: &str,
        #[case] phone: &str,
        #[case] body: &str,
        #[case] expected: ContactValidationError,
    ) {
        let err = ContactMessage::try_from_parts(name, email, phone, body)
            .expect_err("invalid input must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn rejects_over_long_message() {
        let body = "x".repeat(CONTACT_FIELD_MAX + 1);
        let err = ContactMessage::try_from_parts("Ada", "a@x.com", "555-0100", &body)
            .expect_err("over-long message must fail");
        assert_eq!(
            err,
            ContactValidationError::MessageTooLong {
                max: CONTACT_FIELD_MAX
            }
        );
    }
}
