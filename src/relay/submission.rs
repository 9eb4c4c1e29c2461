//! Contact-form payload and its validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Same shape check the portfolio's contact form applies client-side.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Raw contact-form payload as posted by the browser.
///
/// Absent keys and `null` values deserialize as empty strings so they fail
/// validation the same way blank values do.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Submission {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why a submission was rejected before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// At least one of name, email, message is empty or whitespace-only.
    MissingFields,
    /// The reply-to address is not a usable mailbox.
    InvalidEmail,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => f.write_str("missing required fields"),
            Self::InvalidEmail => f.write_str("invalid email address"),
        }
    }
}

/// A submission whose fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    name: String,
    email: String,
    message: String,
}

impl ValidSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Check presence first, then the address shape.
    pub fn validate(&self) -> Result<ValidSubmission, ValidationFailure> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ValidationFailure::MissingFields);
        }

        if !is_valid_email(email) {
            return Err(ValidationFailure::InvalidEmail);
        }

        Ok(ValidSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }
}

/// The address must look like `local@domain.tld` and be accepted by lettre,
/// since it ends up in the `Reply-To` header.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email) && email.parse::<lettre::Address>().is_ok()
}
