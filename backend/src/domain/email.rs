//! Normalised, validated email addresses.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Reasons an email address is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailValidationError {
    Missing,
    Malformed,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Please provide an email"),
            Self::Malformed => write!(f, "Please provide a valid email"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address trimmed and lower-cased so lookups are case-insensitive.
///
/// # Examples
/// ```
/// use leopay::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate raw input.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(EmailValidationError::Missing);
        }
        if !email_regex().is_match(&normalised) {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(normalised))
    }

    /// Rehydrate an address already normalised by storage.
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
