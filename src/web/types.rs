//! Request and response structs of the `web` module and their parsing implementations.
//! Includes the waitlist entry validation and tests for it.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

use crate::model::WaitlistEntry;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable waitlist entry.
/// Can have missing or invalid fields, `null` and absent fields both end up as `None`.
#[derive(Debug, Default, Deserialize)]
pub struct DeserWaitlistEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl DeserWaitlistEntry {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }
}

/// Validated waitlist entry
/// A waitlist entry with all the fields validated
#[derive(Debug, Clone)]
pub struct ValidWaitlistEntry {
    pub name: ValidName,
    pub email: ValidEmail,
}

impl TryFrom<DeserWaitlistEntry> for ValidWaitlistEntry {
    type Error = ValidationErrors;

    /// Validates every field and collects all the violations instead of stopping at the first one.
    fn try_from(deser_entry: DeserWaitlistEntry) -> Result<Self, Self::Error> {
        let name = deser_entry
            .name
            .ok_or(DataParsingError::NameMissing)
            .and_then(ValidName::parse);
        let email = deser_entry
            .email
            .ok_or(DataParsingError::EmailMissing)
            .and_then(ValidEmail::parse);

        match (name, email) {
            (Ok(name), Ok(email)) => Ok(ValidWaitlistEntry { name, email }),
            (name, email) => Err(ValidationErrors(
                [name.err(), email.err()].into_iter().flatten().collect(),
            )),
        }
    }
}

/// Validated Email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.graphemes(true).count() > 256 {
            return Err(DataParsingError::EmailTooLong);
        }

        if value.validate_email() {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

/// Validated Name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidName(String);

impl AsRef<str> for ValidName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidName {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.trim().is_empty() {
            return Err(DataParsingError::NameEmpty);
        }

        Ok(ValidName(value.to_owned()))
    }
}

/// A single violated validation rule as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Body of a successful `POST /waitlist`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub data: WaitlistEntry,
    pub email_sent: bool,
}

/// Body of a successful `GET /waitlist/count`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DataParsingError {
    #[error("name is required")]
    NameMissing,
    #[error("name must not be empty")]
    NameEmpty,

    #[error("email is required")]
    EmailMissing,
    #[error("invalid email format")]
    EmailInvalid,
    #[error("email too long")]
    EmailTooLong,
}

impl DataParsingError {
    /// The name of the field that violated the rule.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameMissing | Self::NameEmpty => "name",
            Self::EmailMissing | Self::EmailInvalid | Self::EmailTooLong => "email",
        }
    }
}

impl From<DataParsingError> for FieldViolation {
    fn from(value: DataParsingError) -> Self {
        FieldViolation {
            field: value.field().to_string(),
            message: value.to_string(),
        }
    }
}

/// All the rules a waitlist submission violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid waitlist entry: {0:?}")]
pub struct ValidationErrors(pub Vec<DataParsingError>);

impl ValidationErrors {
    pub fn violations(&self) -> Vec<FieldViolation> {
        self.0.iter().copied().map(FieldViolation::from).collect()
    }
}
