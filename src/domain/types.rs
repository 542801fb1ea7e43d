//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., well-formed identifiers,
//! bounded and trimmed text, normalized/validated email) so that once a value
//! reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::{ops::Deref, str::FromStr};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string is shorter than the allowed minimum.
    #[error("value must be at least {0} characters long")]
    TooShort(usize),
    /// Provided string is longer than the allowed maximum.
    #[error("value must be at most {0} characters long")]
    TooLong(usize),
    /// Provided number is below zero.
    #[error("value must not be negative")]
    Negative,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided uuid failed format validation.
    #[error("invalid uuid value")]
    InvalidUuid,
    /// Provided timestamp is not RFC 3339.
    #[error("invalid timestamp")]
    InvalidTimestamp,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Trims the value and checks its length in characters against `min..=max`.
fn bounded<S: Into<String>>(value: S, min: usize, max: usize) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(TypeConstraintError::EmptyString);
    }
    if len < min {
        return Err(TypeConstraintError::TooShort(min));
    }
    if len > max {
        return Err(TypeConstraintError::TooLong(max));
    }
    Ok(trimmed)
}

/// Macro to generate UUID-backed identifiers stored as text.
macro_rules! uuid_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the wrapped UUID.
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| TypeConstraintError::InvalidUuid)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }
    };
}

uuid_newtype!(OrgId, "Identifier of the organization owning a row.");
uuid_newtype!(CustomerId, "Unique identifier for a customer.");
uuid_newtype!(TicketId, "Unique identifier for a support ticket.");
uuid_newtype!(TemplateId, "Unique identifier for a reply template.");
uuid_newtype!(NotificationId, "Unique identifier for a notification.");

macro_rules! email_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Validates and normalizes an email string.
            pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
                let normalized = normalize_email(email)?;
                Ok(Self(normalized))
            }

            /// Borrow the email as a `&str`.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the owned inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

email_newtype!(CustomerEmail, "Customer contact address, unique per organization.");
email_newtype!(AgentEmail, "Address of the support agent a ticket is assigned to.");

macro_rules! bounded_string_newtype {
    ($name:ident, $min:expr, $max:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Smallest accepted length in characters.
            pub const MIN_LEN: usize = $min;
            /// Largest accepted length in characters.
            pub const MAX_LEN: usize = $max;

            /// Constructs a trimmed value within the length bounds.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                bounded(value, Self::MIN_LEN, Self::MAX_LEN).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

bounded_string_newtype!(CustomerName, 2, 120, "Customer display name.");
bounded_string_newtype!(PhoneNumber, 1, 40, "Free-form customer phone number.");
bounded_string_newtype!(CompanyName, 1, 120, "Company the customer works for.");
bounded_string_newtype!(TicketSubject, 2, 200, "Ticket subject line.");
bounded_string_newtype!(TicketDescription, 1, 10_000, "Ticket body text.");
bounded_string_newtype!(AiSummary, 1, 2_000, "AI generated ticket summary.");
bounded_string_newtype!(AiCategory, 1, 64, "AI assigned ticket category.");
bounded_string_newtype!(TemplateName, 2, 120, "Reply template name.");
bounded_string_newtype!(TemplateCategory, 1, 64, "Reply template grouping label.");
bounded_string_newtype!(NotificationTitle, 1, 200, "Notification headline.");
bounded_string_newtype!(NotificationBody, 1, 2_000, "Notification details.");

/// Reply template body, sanitized of unsafe HTML.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TemplateBody(String);

impl TemplateBody {
    pub const MAX_LEN: usize = 20_000;

    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        bounded(sanitized, 1, Self::MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for TemplateBody {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-negative counter of how often a template was used.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsageCount(i32);

impl UsageCount {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value < 0 {
            Err(TypeConstraintError::Negative)
        } else {
            Ok(Self(value))
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Generates a closed enum stored and exposed as snake_case text.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Text stored in the database and used on the wire.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::types::TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::domain::types::TypeConstraintError::InvalidValue(
                        other.to_string(),
                    )),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::types::TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use string_enum;

/// Current UTC time truncated to the microsecond precision kept in storage.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

/// Renders a stored timestamp in the canonical external format.
///
/// The output is RFC 3339 in UTC with only as many fractional digits as
/// needed, so parsing it back with [`parse_timestamp`] is lossless.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an RFC 3339 timestamp into a naive UTC value.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TypeConstraintError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .map_err(|_| TypeConstraintError::InvalidTimestamp)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn customer_name_enforces_bounds() {
        assert_eq!(CustomerName::new("  Ada  ").unwrap().as_str(), "Ada");
        assert_eq!(CustomerName::new("A"), Err(TypeConstraintError::TooShort(2)));
        assert_eq!(CustomerName::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(
            CustomerName::new("x".repeat(121)),
            Err(TypeConstraintError::TooLong(120))
        );
    }

    #[test]
    fn email_is_lowercased() {
        let email = CustomerEmail::new(" Jane@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane@example.com");
        assert_eq!(
            CustomerEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn template_body_is_sanitized() {
        let body = TemplateBody::new("Hi <script>alert(1)</script><b>there</b>").unwrap();
        assert_eq!(body.as_str(), "Hi <b>there</b>");
        assert_eq!(
            TemplateBody::new("<script>x</script>"),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn usage_count_rejects_negative() {
        assert!(UsageCount::new(0).is_ok());
        assert_eq!(UsageCount::new(-1), Err(TypeConstraintError::Negative));
    }

    #[test]
    fn ids_parse_and_display() {
        let id = TicketId::new();
        let parsed: TicketId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(
            "nope".parse::<TicketId>(),
            Err(TypeConstraintError::InvalidUuid)
        );
    }

    #[test]
    fn timestamps_round_trip_without_loss() {
        let value = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_micro_opt(9, 30, 15, 120_034)
            .unwrap();
        let text = format_timestamp(value);
        assert_eq!(text, "2024-05-17T09:30:15.120034Z");
        assert_eq!(parse_timestamp(&text).unwrap(), value);

        let whole = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap();
        assert_eq!(format_timestamp(whole), "2024-05-17T09:30:15Z");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn now_has_microsecond_precision() {
        use chrono::Timelike;
        assert_eq!(now().nanosecond() % 1_000, 0);
    }
}
