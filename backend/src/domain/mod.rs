//! Domain primitives, aggregates and workflow services.
//!
//! Purpose: hold the user onboarding workflow and the lead lifecycle behind
//! strongly typed entities and ports. Nothing here knows about HTTP, Diesel
//! or token formats.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - User, UserProfile, WorkflowState: accounts and onboarding progress.
//! - Lead, LeadStatus, LeadStats: referred clients and commission.
//! - UserWorkflowService, LeadWorkflowService: implementations of the driving
//!   ports in [`ports`].

pub mod auth;
pub mod email;
pub mod error;
pub mod lead;
pub mod lead_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod workflow;

pub use self::auth::{
    INVALID_CREDENTIALS, LoginCredentials, MissingCredentials, NOT_AUTHORIZED, PASSWORD_MIN_LEN,
    Registration, RoleDenied, authorize,
};
pub use self::email::{EmailAddress, EmailValidationError};
pub use self::error::{Error, ErrorBody, ErrorCode};
pub use self::lead::{
    CommissionRate, HunterSummary, InvalidStatus, Lead, LeadDraft, LeadId, LeadStats, LeadStatus,
    LeadWithHunter, NewLead,
};
pub use self::lead_service::LeadWorkflowService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{PasswordHash, Role, User, UserId, UserProfile};
pub use self::user_service::{AdminAccount, AdminBootstrap, UserWorkflowService};
pub use self::workflow::{
    MAX_COUNTER, MeetingRequest, MissingMeetingSlot, ProgressOutOfRange, ProgressUpdate, VideoId,
    WorkflowError, WorkflowStage, WorkflowState,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use leopay::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
