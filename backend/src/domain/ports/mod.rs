//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod lead_repository;
mod lead_workflow;
mod token_service;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
pub use lead_repository::{LeadPersistenceError, LeadRepository};
#[cfg(test)]
pub use lead_workflow::MockLeadWorkflow;
pub use lead_workflow::{LeadWorkflow, StatusChange};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_accounts::{MockSessionResolver, MockUserAccounts, MockUserAdministration};
pub use user_accounts::{AuthSession, SessionResolver, UserAccounts, UserAdministration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
