//! PostgreSQL-backed `LeadRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LeadPersistenceError, LeadRepository};
use crate::domain::{
    CommissionRate, EmailAddress, HunterSummary, Lead, LeadId, LeadStats, LeadStatus,
    LeadWithHunter, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LeadRow, LeadUpdate, NewLeadRow};
use super::pool::{DbPool, PoolError};
use super::schema::{leads, users};

/// Diesel-backed implementation of the `LeadRepository` port.
#[derive(Clone)]
pub struct DieselLeadRepository {
    pool: DbPool,
}

impl DieselLeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> LeadPersistenceError {
    map_pool_error(error, LeadPersistenceError::connection)
}

fn diesel_error(error: &diesel::result::Error) -> LeadPersistenceError {
    map_diesel_error(
        error,
        LeadPersistenceError::query,
        LeadPersistenceError::connection,
    )
}

fn count_from_db(value: i64) -> Result<u64, LeadPersistenceError> {
    u64::try_from(value).map_err(|_| LeadPersistenceError::query("negative row count"))
}

/// Convert a database row to a domain lead.
fn row_to_lead(row: LeadRow) -> Result<Lead, LeadPersistenceError> {
    let status: LeadStatus = row
        .status
        .parse()
        .map_err(|_| LeadPersistenceError::query(format!("unknown lead status {}", row.status)))?;
    let commission_rate = CommissionRate::new(row.commission_rate).ok_or_else(|| {
        LeadPersistenceError::query(format!("commission rate out of range for lead {}", row.id))
    })?;

    Ok(Lead {
        id: LeadId::from_uuid(row.id),
        hunter_id: UserId::from_uuid(row.hunter_id),
        client_name: row.client_name,
        company_name: row.company_name,
        email: EmailAddress::from_trusted(row.email),
        phone: row.phone,
        alternate_phone: row.alternate_phone,
        address: row.address,
        business_type: row.business_type,
        project_requirements: row.project_requirements,
        budget: row.budget,
        additional_notes: row.additional_notes,
        status,
        commission_rate,
        project_value: row.project_value,
        commission_earned: row.commission_earned,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl LeadRepository for DieselLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<(), LeadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewLeadRow {
            id: *lead.id.as_uuid(),
            hunter_id: *lead.hunter_id.as_uuid(),
            client_name: &lead.client_name,
            company_name: lead.company_name.as_deref(),
            email: lead.email.as_ref(),
            phone: &lead.phone,
            alternate_phone: lead.alternate_phone.as_deref(),
            address: lead.address.as_deref(),
            business_type: &lead.business_type,
            project_requirements: &lead.project_requirements,
            budget: &lead.budget,
            additional_notes: lead.additional_notes.as_deref(),
            status: lead.status.as_str(),
            commission_rate: lead.commission_rate.value(),
            project_value: lead.project_value,
            commission_earned: lead.commission_earned,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        };

        diesel::insert_into(leads::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| diesel_error(&err))
    }

    async fn update(&self, lead: &Lead) -> Result<(), LeadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = LeadUpdate {
            status: lead.status.as_str(),
            project_value: lead.project_value,
            commission_earned: lead.commission_earned,
            updated_at: lead.updated_at,
        };

        let affected = diesel::update(leads::table.find(lead.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        if affected == 0 {
            return Err(LeadPersistenceError::missing(lead.id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, LeadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<LeadRow> = leads::table
            .find(id.as_uuid())
            .select(LeadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;
        row.map(row_to_lead).transpose()
    }

    async fn list_for_hunter(&self, hunter: &UserId) -> Result<Vec<Lead>, LeadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<LeadRow> = leads::table
            .filter(leads::hunter_id.eq(hunter.as_uuid()))
            .order(leads::created_at.desc())
            .select(LeadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        rows.into_iter().map(row_to_lead).collect()
    }

    async fn list_all_with_hunters(&self) -> Result<Vec<LeadWithHunter>, LeadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(LeadRow, String, String)> = leads::table
            .inner_join(users::table)
            .order(leads::created_at.desc())
            .select((LeadRow::as_select(), users::name, users::email))
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;

        rows.into_iter()
            .map(|(row, name, email)| {
                let lead = row_to_lead(row)?;
                let hunter = HunterSummary {
                    id: lead.hunter_id,
                    name,
                    email: EmailAddress::from_trusted(email),
                };
                Ok(LeadWithHunter { lead, hunter })
            })
            .collect()
    }

    async fn stats_for_hunter(&self, hunter: &UserId) -> Result<LeadStats, LeadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let owned = leads::table.filter(leads::hunter_id.eq(*hunter.as_uuid()));
        let completed = owned
            .clone()
            .filter(leads::status.eq(LeadStatus::Completed.as_str()));

        let total: i64 = owned
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        let converted: i64 = completed
            .clone()
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        let earnings: Option<f64> = completed
            .select(diesel::dsl::sum(leads::commission_earned))
            .first(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;

        Ok(LeadStats {
            total_leads: count_from_db(total)?,
            converted_leads: count_from_db(converted)?,
            total_earnings: earnings.unwrap_or(0.0),
        })
    }
}
