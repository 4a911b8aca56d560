//! Lead handlers under `/api/leads`.
//!
//! ```text
//! POST /api/leads {"clientName":"Acme","email":"ops@acme.test",...}
//! GET /api/leads
//! GET /api/leads/stats
//! GET /api/leads/all
//! PUT /api/leads/{id}/status {"status":"completed","projectValue":2000}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::StatusChange;
use crate::domain::{Error, ErrorBody, Lead, LeadDraft, LeadId, LeadStats, LeadWithHunter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::state::HttpState;

/// Envelope wrapping a single lead.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeadResponse {
    pub success: bool,
    pub lead: Lead,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            success: true,
            lead,
        }
    }
}

/// Counted list of leads.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeadListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub leads: Vec<T>,
}

impl<T> From<Vec<T>> for LeadListResponse<T> {
    fn from(leads: Vec<T>) -> Self {
        Self {
            success: true,
            count: leads.len(),
            leads,
        }
    }
}

/// Dashboard figures for the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: LeadStats,
}

fn parse_lead_id(raw: &str) -> Result<LeadId, Error> {
    raw.parse().map_err(|_| Error::not_found("Lead not found"))
}

/// Submit a lead owned by the caller.
#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = LeadDraft,
    responses(
        (status = 201, description = "Lead created", body = LeadResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["leads"],
    operation_id = "createLead"
)]
#[post("")]
pub async fn create_lead(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<LeadDraft>,
) -> ApiResult<HttpResponse> {
    let lead = state
        .leads
        .create(identity.id(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(LeadResponse::from(lead)))
}

/// The caller's leads, newest first.
#[utoipa::path(
    get,
    path = "/api/leads",
    responses(
        (status = 200, description = "Own leads", body = LeadListResponse<Lead>),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["leads"],
    operation_id = "listOwnLeads"
)]
#[get("")]
pub async fn list_leads(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<LeadListResponse<Lead>>> {
    let leads = state.leads.list_for_hunter(identity.id()).await?;
    Ok(web::Json(leads.into()))
}

#[utoipa::path(
    get,
    path = "/api/leads/stats",
    responses(
        (status = 200, description = "Lead statistics", body = StatsResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["leads"],
    operation_id = "leadStats"
)]
#[get("/stats")]
pub async fn lead_stats(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<StatsResponse>> {
    let stats = state.leads.stats(identity.id()).await?;
    Ok(web::Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// Every lead with its hunter, newest first.
#[utoipa::path(
    get,
    path = "/api/leads/all",
    responses(
        (status = 200, description = "All leads", body = LeadListResponse<LeadWithHunter>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["leads"],
    operation_id = "listAllLeads"
)]
#[get("/all")]
pub async fn list_all_leads(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<LeadListResponse<LeadWithHunter>>> {
    identity.require_admin()?;
    let leads = state.leads.list_all().await?;
    Ok(web::Json(leads.into()))
}

/// Move a lead to a new status, recording the project value on completion.
#[utoipa::path(
    put,
    path = "/api/leads/{id}/status",
    params(("id" = String, Path, description = "Lead identifier")),
    request_body = StatusChange,
    responses(
        (status = 200, description = "Updated lead", body = LeadResponse),
        (status = 400, description = "Invalid status", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Lead not found", body = ErrorBody)
    ),
    tags = ["leads"],
    operation_id = "updateLeadStatus"
)]
#[put("/{id}/status")]
pub async fn update_lead_status(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
    payload: web::Json<StatusChange>,
) -> ApiResult<web::Json<LeadResponse>> {
    identity.require_admin()?;
    let lead_id = parse_lead_id(&path)?;
    let lead = state.leads.update_status(&lead_id, &payload).await?;
    Ok(web::Json(lead.into()))
}

#[cfg(test)]
#[path = "leads_tests.rs"]
mod tests;
