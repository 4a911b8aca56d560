//! Driving port for lead use-cases.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, Lead, LeadDraft, LeadId, LeadStats, LeadWithHunter, UserId};

/// Administrator request to move a lead to a new status.
///
/// `status` stays a raw string so unknown values surface as a validation
/// error rather than a body-parsing failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    #[schema(example = "completed")]
    pub status: Option<String>,
    #[schema(example = 2000.0)]
    pub project_value: Option<f64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadWorkflow: Send + Sync {
    async fn create(&self, hunter: &UserId, draft: LeadDraft) -> Result<Lead, Error>;

    async fn list_for_hunter(&self, hunter: &UserId) -> Result<Vec<Lead>, Error>;

    async fn stats(&self, hunter: &UserId) -> Result<LeadStats, Error>;

    async fn list_all(&self) -> Result<Vec<LeadWithHunter>, Error>;

    /// Rejects an unknown status before touching storage.
    async fn update_status(&self, lead: &LeadId, change: &StatusChange) -> Result<Lead, Error>;
}
