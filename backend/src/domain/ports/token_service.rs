//! Port for signed bearer tokens.

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// Signature, encoding or claim shape is wrong.
        Invalid { message: String } => "token rejected: {message}",
        /// The expiry claim lies in the past.
        Expired => "token expired",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issues and verifies bearer tokens naming a user.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &UserId) -> Result<String, TokenError>;

    /// Check the signature, then the expiry claim against the current time.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
