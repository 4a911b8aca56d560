//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already owns the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// An update targeted a record that does not exist.
        Missing { id: String } => "user {id} does not exist",
    }
}

/// Storage for user accounts.
///
/// Updates replace the whole record. Concurrent writers to the same user
/// resolve as last-writer-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateEmail` when the address is
    /// taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Persist the full record of an existing account.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Hunters who passed the quiz and still lack dashboard access.
    async fn list_candidates(&self) -> Result<Vec<User>, UserPersistenceError>;
}
