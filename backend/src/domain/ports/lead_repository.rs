//! Port abstraction for lead persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Lead, LeadId, LeadStats, LeadWithHunter, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by lead repository adapters.
    pub enum LeadPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "lead repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "lead repository query failed: {message}",
        /// An update targeted a record that does not exist.
        Missing { id: String } => "lead {id} does not exist",
    }
}

/// Storage for leads. Listings are ordered newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn insert(&self, lead: &Lead) -> Result<(), LeadPersistenceError>;

    /// Persist the full record of an existing lead.
    async fn update(&self, lead: &Lead) -> Result<(), LeadPersistenceError>;

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, LeadPersistenceError>;

    async fn list_for_hunter(&self, hunter: &UserId) -> Result<Vec<Lead>, LeadPersistenceError>;

    /// Every lead joined with its owning hunter.
    async fn list_all_with_hunters(&self) -> Result<Vec<LeadWithHunter>, LeadPersistenceError>;

    async fn stats_for_hunter(&self, hunter: &UserId) -> Result<LeadStats, LeadPersistenceError>;
}
