//! Driving ports for account use-cases.
//!
//! Inbound adapters call these traits without importing persistence or
//! credential infrastructure, so handler tests can substitute doubles.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, MeetingRequest, ProgressUpdate, Registration, User, UserId,
    UserProfile,
};

/// Authenticated profile with a freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

/// Self-service account operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Fails with the same error for an unknown email and a wrong password.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    async fn profile(&self, user: &UserId) -> Result<UserProfile, Error>;

    async fn update_progress(
        &self,
        user: &UserId,
        update: &ProgressUpdate,
    ) -> Result<UserProfile, Error>;
}

/// Administrator operations over hunters' workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    async fn list_candidates(&self) -> Result<Vec<UserProfile>, Error>;

    async fn schedule_meeting(
        &self,
        user: &UserId,
        request: &MeetingRequest,
    ) -> Result<UserProfile, Error>;

    async fn approve_dashboard(&self, user: &UserId) -> Result<UserProfile, Error>;
}

/// Resolves a bearer token to the account it names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Every failure is `Unauthorized` with the same client message.
    async fn resolve(&self, token: &str) -> Result<User, Error>;
}
