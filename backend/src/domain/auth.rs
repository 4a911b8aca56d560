//! Authentication primitives: login credentials, registration input and
//! role checks.
//!
//! Inbound payload parsing stays outside the domain. Handlers call these
//! constructors before talking to a service.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, Role, User};

/// Client-facing message for every authentication failure at the gateway.
pub const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Client-facing message for failed logins, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Returned when a login payload lacks an email or a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCredentials;

impl fmt::Display for MissingCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Please provide email and password")
    }
}

impl std::error::Error for MissingCredentials {}

/// Login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. It is not pattern checked;
///   a malformed address simply fails to match any account.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use leopay::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, MissingCredentials> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() || password.is_empty() {
            return Err(MissingCredentials);
        }

        Ok(Self {
            email: normalized,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate every field and report all failures joined with `", "`.
    pub fn try_from_parts(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, String> {
        let mut problems = Vec::new();

        let name = name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            problems.push("Please provide a name".to_owned());
        }
        let email = EmailAddress::parse(email.unwrap_or_default())
            .map_err(|err| problems.push(err.to_string()))
            .ok();
        let password = password.unwrap_or_default();
        if password.is_empty() {
            problems.push("Please provide a password".to_owned());
        } else if password.chars().count() < PASSWORD_MIN_LEN {
            problems.push(format!(
                "Password must be at least {PASSWORD_MIN_LEN} characters"
            ));
        }
        let phone = phone.map(str::trim).unwrap_or_default();
        if phone.is_empty() {
            problems.push("Please provide a phone number".to_owned());
        }

        match email {
            Some(email) if problems.is_empty() => Ok(Self {
                name: name.to_owned(),
                email,
                phone: phone.to_owned(),
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(problems.join(", ")),
        }
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raised when an authenticated user's role is outside the allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDenied(pub Role);

impl fmt::Display for RoleDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User role {} is not authorized to access this route",
            self.0
        )
    }
}

impl std::error::Error for RoleDenied {}

/// Check `user` holds one of `allowed`.
pub fn authorize(user: &User, allowed: &[Role]) -> Result<(), RoleDenied> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(RoleDenied(user.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordHash;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("   ", "pw")]
    #[case("ada@example.com", "")]
    fn login_requires_both_fields(#[case] email: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("missing inputs must fail");
        assert_eq!(err.to_string(), "Please provide email and password");
    }

    #[rstest]
    fn login_keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("ada@example.com", " pw ")
            .expect("valid inputs");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn registration_accepts_complete_input() {
        let registration = Registration::try_from_parts(
            Some(" Ada "),
            Some("ADA@example.com"),
            Some("secret1"),
            Some("555-0100"),
        )
        .expect("valid registration");
        assert_eq!(registration.name, "Ada");
        assert_eq!(registration.email.as_ref(), "ada@example.com");
        assert_eq!(registration.password(), "secret1");
    }

    #[rstest]
    fn registration_reports_every_problem() {
        let err = Registration::try_from_parts(None, Some("nope"), Some("abc"), Some(" "))
            .expect_err("invalid registration");
        assert_eq!(
            err,
            "Please provide a name, Please provide a valid email, \
             Password must be at least 6 characters, Please provide a phone number"
        );
    }

    #[rstest]
    #[case(Role::Admin, &[Role::Admin], true)]
    #[case(Role::User, &[Role::Admin], false)]
    #[case(Role::User, &[Role::User, Role::Admin], true)]
    fn authorize_checks_membership(
        #[case] role: Role,
        #[case] allowed: &[Role],
        #[case] permitted: bool,
    ) {
        let mut user = User::register(
            "Ada".to_owned(),
            EmailAddress::parse("ada@example.com").expect("valid email"),
            "555".to_owned(),
            PasswordHash::new("hash"),
            Utc::now(),
        );
        user.role = role;
        assert_eq!(authorize(&user, allowed).is_ok(), permitted);
    }

    #[rstest]
    fn denial_names_the_role() {
        assert_eq!(
            RoleDenied(Role::User).to_string(),
            "User role user is not authorized to access this route"
        );
    }
}
