//! Argon2id implementation of [`CredentialHasher`].

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Hashes with Argon2id default parameters and a random salt per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|err| CredentialHashError::hashing(err.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError> {
        let parsed = argon2::PasswordHash::new(hash.as_str())
            .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHashError::malformed_hash(err.to_string())),
        }
    }
}
