//! Administrator handlers for the onboarding workflow.
//!
//! ```text
//! GET /api/auth/admin/candidates
//! PUT /api/auth/admin/schedule/{userId} {"meetingDate":"2024-05-01","meetingTime":"14:30"}
//! PUT /api/auth/admin/approve/{userId}
//! ```

use actix_web::{get, put, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorBody, MeetingRequest, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::body::JsonOrEmpty;
use crate::inbound::http::state::HttpState;

/// Users who passed the quiz and still await dashboard access.
#[derive(Debug, Serialize, ToSchema)]
pub struct CandidatesResponse {
    pub success: bool,
    pub candidates: Vec<UserProfile>,
}

/// Summary returned after scheduling a meeting.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    #[schema(value_type = String)]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub meeting_scheduled: bool,
}

/// Summary returned after granting dashboard access.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessSummary {
    #[schema(value_type = String)]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub dashboard_access: bool,
}

/// `{ success, message, user }` envelope for workflow transitions.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionResponse<T> {
    pub success: bool,
    pub message: String,
    pub user: T,
}

/// Unparseable identifiers cannot name a stored user.
fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.parse().map_err(|_| Error::not_found("User not found"))
}

#[utoipa::path(
    get,
    path = "/api/auth/admin/candidates",
    responses(
        (status = 200, description = "Candidates awaiting review", body = CandidatesResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["admin"],
    operation_id = "listCandidates"
)]
#[get("/candidates")]
pub async fn list_candidates(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<CandidatesResponse>> {
    identity.require_admin()?;
    let candidates = state.admin.list_candidates().await?;
    Ok(web::Json(CandidatesResponse {
        success: true,
        candidates,
    }))
}

/// Mark a meeting as scheduled. The slot is validated but not stored; an
/// absent body counts as an empty slot.
#[utoipa::path(
    put,
    path = "/api/auth/admin/schedule/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = MeetingRequest,
    responses(
        (status = 200, description = "Meeting scheduled", body = TransitionResponse<MeetingSummary>),
        (status = 400, description = "Missing date or time", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["admin"],
    operation_id = "scheduleMeeting"
)]
#[put("/schedule/{user_id}")]
pub async fn schedule_meeting(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
    payload: JsonOrEmpty<MeetingRequest>,
) -> ApiResult<web::Json<TransitionResponse<MeetingSummary>>> {
    identity.require_admin()?;
    let user_id = parse_user_id(&path)?;
    let profile = state.admin.schedule_meeting(&user_id, &payload).await?;
    Ok(web::Json(TransitionResponse {
        success: true,
        message: "Meeting scheduled successfully".to_owned(),
        user: MeetingSummary {
            id: profile.id,
            name: profile.name,
            email: profile.email.to_string(),
            meeting_scheduled: profile.meeting_scheduled,
        },
    }))
}

/// Grant dashboard access once a meeting is scheduled.
#[utoipa::path(
    put,
    path = "/api/auth/admin/approve/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Access granted", body = TransitionResponse<AccessSummary>),
        (status = 400, description = "Meeting not yet scheduled", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["admin"],
    operation_id = "approveDashboardAccess"
)]
#[put("/approve/{user_id}")]
pub async fn approve_dashboard(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse<AccessSummary>>> {
    identity.require_admin()?;
    let user_id = parse_user_id(&path)?;
    let profile = state.admin.approve_dashboard(&user_id).await?;
    Ok(web::Json(TransitionResponse {
        success: true,
        message: "Dashboard access approved successfully".to_owned(),
        user: AccessSummary {
            id: profile.id,
            name: profile.name,
            email: profile.email.to_string(),
            dashboard_access: profile.dashboard_access,
        },
    }))
}
