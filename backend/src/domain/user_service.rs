//! User workflow service.
//!
//! Implements the account, administration and session driving ports on top
//! of the user repository and the credential ports. Workflow legality is
//! delegated to [`WorkflowState`](crate::domain::WorkflowState).

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthSession, CredentialHashError, CredentialHasher, SessionResolver, TokenError,
    TokenService, UserAccounts, UserAdministration, UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, Error, INVALID_CREDENTIALS, LoginCredentials, MeetingRequest, NOT_AUTHORIZED,
    ProgressUpdate, Registration, Role, User, UserId, UserProfile, WorkflowState,
};

const USER_NOT_FOUND: &str = "User not found";
const DUPLICATE_EMAIL: &str = "User with this email already exists";

/// Administrator account reconciled at start-up.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub name: String,
    pub email: EmailAddress,
    pub password: Zeroizing<String>,
}

/// Outcome of [`UserWorkflowService::bootstrap_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrap {
    Created,
    PasswordReconciled,
}

/// Service implementing the user-facing driving ports.
#[derive(Clone)]
pub struct UserWorkflowService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> UserWorkflowService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL),
        UserPersistenceError::Missing { .. } => Error::not_found(USER_NOT_FOUND),
    }
}

fn map_hash_error(error: CredentialHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_issue_error(error: TokenError) -> Error {
    Error::internal(error.to_string())
}

impl<U, H, T> UserWorkflowService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn save(&self, user: &User) -> Result<UserProfile, Error> {
        self.users.update(user).await.map_err(map_user_error)?;
        Ok(user.profile())
    }

    fn session_for(&self, user: &User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user.id).map_err(map_issue_error)?;
        Ok(AuthSession {
            user: user.profile(),
            token,
        })
    }

    /// Create the configured administrator, or overwrite its password hash
    /// when the account already exists. Other fields are left untouched.
    pub async fn bootstrap_admin(&self, admin: &AdminAccount) -> Result<AdminBootstrap, Error> {
        let password_hash = self.hasher.hash(&admin.password).map_err(map_hash_error)?;
        let existing = self
            .users
            .find_by_email(&admin.email)
            .await
            .map_err(map_user_error)?;

        if let Some(mut user) = existing {
            user.password_hash = password_hash;
            self.users.update(&user).await.map_err(map_user_error)?;
            info!(email = %admin.email, "admin password reconciled with configuration");
            return Ok(AdminBootstrap::PasswordReconciled);
        }

        let mut user = User::register(
            admin.name.clone(),
            admin.email.clone(),
            String::new(),
            password_hash,
            self.clock.utc(),
        );
        user.role = Role::Admin;
        user.workflow = WorkflowState::completed();
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(email = %admin.email, user_id = %user.id, "admin account created");
        Ok(AdminBootstrap::Created)
    }
}

#[async_trait]
impl<U, H, T> UserAccounts for UserWorkflowService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let existing = self
            .users
            .find_by_email(&registration.email)
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(Error::conflict(DUPLICATE_EMAIL));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let user = User::register(
            registration.name,
            registration.email,
            registration.phone,
            password_hash,
            self.clock.utc(),
        );
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "user registered");
        self.session_for(&user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let email = EmailAddress::from_trusted(credentials.email().to_owned());
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            warn!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            warn!(user_id = %user.id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.session_for(&user)
    }

    async fn profile(&self, user: &UserId) -> Result<UserProfile, Error> {
        Ok(self.load(user).await?.profile())
    }

    async fn update_progress(
        &self,
        user: &UserId,
        update: &ProgressUpdate,
    ) -> Result<UserProfile, Error> {
        update
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut record = self.load(user).await?;
        record.workflow.apply_progress(update);
        self.save(&record).await
    }
}

#[async_trait]
impl<U, H, T> UserAdministration for UserWorkflowService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    async fn list_candidates(&self) -> Result<Vec<UserProfile>, Error> {
        let users = self.users.list_candidates().await.map_err(map_user_error)?;
        Ok(users
            .iter()
            .filter(|user| user.is_candidate())
            .map(User::profile)
            .collect())
    }

    async fn schedule_meeting(
        &self,
        user: &UserId,
        request: &MeetingRequest,
    ) -> Result<UserProfile, Error> {
        request
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut record = self.load(user).await?;
        record.workflow.schedule_meeting();
        self.save(&record).await
    }

    async fn approve_dashboard(&self, user: &UserId) -> Result<UserProfile, Error> {
        let mut record = self.load(user).await?;
        record
            .workflow
            .approve_dashboard()
            .map_err(|err| Error::precondition_failed(err.to_string()))?;
        self.save(&record).await
    }
}

#[async_trait]
impl<U, H, T> SessionResolver for UserWorkflowService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    async fn resolve(&self, token: &str) -> Result<User, Error> {
        let id = self.tokens.verify(token).map_err(|err| {
            match &err {
                TokenError::Expired => warn!("bearer token expired"),
                other => warn!(reason = %other, "bearer token rejected"),
            }
            Error::unauthorized(NOT_AUTHORIZED)
        })?;

        match self.users.find_by_id(&id).await.map_err(map_user_error)? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id = %id, "bearer token names a missing user");
                Err(Error::unauthorized(NOT_AUTHORIZED))
            }
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
