//! Port for one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by hashing adapters.
    pub enum CredentialHashError {
        /// Hash generation failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted one-way password hashing.
///
/// Hashing the same input twice yields different encodings, and both verify.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHashError>;

    /// `Ok(false)` on mismatch; errors are reserved for unusable hashes.
    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError>;
}
