//! Lead workflow service implementing the [`LeadWorkflow`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{LeadPersistenceError, LeadRepository, LeadWorkflow, StatusChange};
use crate::domain::{
    Error, InvalidStatus, Lead, LeadDraft, LeadId, LeadStats, LeadStatus, LeadWithHunter, UserId,
};

const LEAD_NOT_FOUND: &str = "Lead not found";

#[derive(Clone)]
pub struct LeadWorkflowService<L> {
    leads: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> LeadWorkflowService<L> {
    pub fn new(leads: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { leads, clock }
    }
}

fn map_lead_error(error: LeadPersistenceError) -> Error {
    match error {
        LeadPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("lead repository unavailable: {message}"))
        }
        LeadPersistenceError::Query { message } => {
            Error::internal(format!("lead repository error: {message}"))
        }
        LeadPersistenceError::Missing { .. } => Error::not_found(LEAD_NOT_FOUND),
    }
}

#[async_trait]
impl<L> LeadWorkflow for LeadWorkflowService<L>
where
    L: LeadRepository,
{
    async fn create(&self, hunter: &UserId, draft: LeadDraft) -> Result<Lead, Error> {
        let fields = draft.validate().map_err(Error::invalid_request)?;
        let lead = Lead::create(*hunter, fields, self.clock.utc());
        self.leads.insert(&lead).await.map_err(map_lead_error)?;
        info!(lead_id = %lead.id, hunter_id = %hunter, "lead created");
        Ok(lead)
    }

    async fn list_for_hunter(&self, hunter: &UserId) -> Result<Vec<Lead>, Error> {
        self.leads
            .list_for_hunter(hunter)
            .await
            .map_err(map_lead_error)
    }

    async fn stats(&self, hunter: &UserId) -> Result<LeadStats, Error> {
        self.leads
            .stats_for_hunter(hunter)
            .await
            .map_err(map_lead_error)
    }

    async fn list_all(&self) -> Result<Vec<LeadWithHunter>, Error> {
        self.leads
            .list_all_with_hunters()
            .await
            .map_err(map_lead_error)
    }

    async fn update_status(&self, lead: &LeadId, change: &StatusChange) -> Result<Lead, Error> {
        let status: LeadStatus = change
            .status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|err: InvalidStatus| Error::invalid_request(err.to_string()))?;

        let mut record = self
            .leads
            .find_by_id(lead)
            .await
            .map_err(map_lead_error)?
            .ok_or_else(|| Error::not_found(LEAD_NOT_FOUND))?;
        record.transition(status, change.project_value, self.clock.utc());
        self.leads.update(&record).await.map_err(map_lead_error)?;
        info!(lead_id = %record.id, status = %status, "lead status updated");
        Ok(record)
    }
}

#[cfg(test)]
#[path = "lead_service_tests.rs"]
mod tests;
