//! In-memory implementation of [`LeadRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{LeadPersistenceError, LeadRepository, UserRepository};
use crate::domain::{HunterSummary, Lead, LeadId, LeadStats, LeadWithHunter, UserId};

use super::InMemoryUserRepository;

/// Vector-backed lead store. Hunter details are joined from the user store.
#[derive(Debug)]
pub struct InMemoryLeadRepository {
    leads: RwLock<Vec<Lead>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryLeadRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            leads: RwLock::new(Vec::new()),
            users,
        }
    }

    /// Newest first; leads created at the same instant keep reverse
    /// insertion order.
    async fn newest_first(&self, hunter: Option<&UserId>) -> Vec<Lead> {
        let leads = self.leads.read().await;
        let mut selected: Vec<Lead> = leads
            .iter()
            .rev()
            .filter(|lead| hunter.is_none_or(|id| lead.hunter_id == *id))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<(), LeadPersistenceError> {
        self.leads.write().await.push(lead.clone());
        Ok(())
    }

    async fn update(&self, lead: &Lead) -> Result<(), LeadPersistenceError> {
        let mut leads = self.leads.write().await;
        let Some(slot) = leads.iter_mut().find(|stored| stored.id == lead.id) else {
            return Err(LeadPersistenceError::missing(lead.id.to_string()));
        };
        *slot = lead.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, LeadPersistenceError> {
        let leads = self.leads.read().await;
        Ok(leads.iter().find(|lead| lead.id == *id).cloned())
    }

    async fn list_for_hunter(&self, hunter: &UserId) -> Result<Vec<Lead>, LeadPersistenceError> {
        Ok(self.newest_first(Some(hunter)).await)
    }

    async fn list_all_with_hunters(&self) -> Result<Vec<LeadWithHunter>, LeadPersistenceError> {
        let mut joined = Vec::new();
        for lead in self.newest_first(None).await {
            let hunter = self
                .users
                .find_by_id(&lead.hunter_id)
                .await
                .map_err(|err| LeadPersistenceError::query(err.to_string()))?;
            if let Some(hunter) = hunter {
                joined.push(LeadWithHunter {
                    lead,
                    hunter: HunterSummary {
                        id: hunter.id,
                        name: hunter.name,
                        email: hunter.email,
                    },
                });
            }
        }
        Ok(joined)
    }

    async fn stats_for_hunter(&self, hunter: &UserId) -> Result<LeadStats, LeadPersistenceError> {
        let leads = self.leads.read().await;
        Ok(LeadStats::from_leads(
            leads.iter().filter(|lead| lead.hunter_id == *hunter),
        ))
    }
}
