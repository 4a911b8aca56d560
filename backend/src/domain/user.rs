//! User data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{EmailAddress, VideoId, WorkflowStage, WorkflowState};

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Authorisation role, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Encoded password hash. Never serialised and redacted from debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered account, including the credential.
///
/// Handlers never render this type directly; they go through
/// [`UserProfile`] so the hash cannot leak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub workflow: WorkflowState,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh hunter account with workflow defaults.
    pub fn register(
        name: String,
        email: EmailAddress,
        phone: String,
        password_hash: PasswordHash,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::random(),
            name,
            email,
            phone,
            password_hash,
            role: Role::User,
            workflow: WorkflowState::default(),
            created_at: now,
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.role == Role::User && self.workflow.awaits_review()
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Sanitised projection of a [`User`] returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: EmailAddress,
    pub phone: String,
    pub role: Role,
    pub dashboard_access: bool,
    pub training_progress: u32,
    #[schema(value_type = Vec<u32>)]
    pub videos_watched: Vec<VideoId>,
    pub quiz_passed: bool,
    pub meeting_scheduled: bool,
    pub stage: WorkflowStage,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            dashboard_access: user.workflow.dashboard_access,
            training_progress: user.workflow.training_progress,
            videos_watched: user.workflow.videos_watched.iter().copied().collect(),
            quiz_passed: user.workflow.quiz_passed,
            meeting_scheduled: user.workflow.meeting_scheduled,
            stage: user.workflow.stage(),
            created_at: user.created_at,
        }
    }
}
