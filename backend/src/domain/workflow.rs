//! Onboarding workflow state for hunters.
//!
//! Storage keeps the workflow as independent fields. The legality rules for
//! moving between stages live here as pure functions so services and
//! adapters never re-implement them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a training video.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct VideoId(pub u32);

/// Coarse stage derived from the workflow fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Registered,
    Training,
    QuizPassed,
    MeetingScheduled,
    DashboardGranted,
}

/// Raised when a transition is attempted before its prerequisite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Meeting must be scheduled before approving dashboard access")]
    MeetingNotScheduled,
}

/// Largest counter value either store can hold.
pub const MAX_COUNTER: u32 = i32::MAX.unsigned_abs();

/// Raised when a submitted counter exceeds [`MAX_COUNTER`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProgressOutOfRange(String);

/// Partial progress update submitted by a hunter.
///
/// Every field is optional; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub training_progress: Option<u32>,
    pub quiz_passed: Option<bool>,
    pub meeting_scheduled: Option<bool>,
    pub dashboard_access: Option<bool>,
    #[schema(value_type = Option<u32>)]
    pub video_id: Option<VideoId>,
}

impl ProgressUpdate {
    /// Reject counters the stores cannot represent, naming every offender.
    pub fn validate(&self) -> Result<(), ProgressOutOfRange> {
        let mut problems = Vec::new();
        if self.training_progress.is_some_and(|progress| progress > MAX_COUNTER) {
            problems.push("Training progress is out of range");
        }
        if self.video_id.is_some_and(|VideoId(id)| id > MAX_COUNTER) {
            problems.push("Video id is out of range");
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ProgressOutOfRange(problems.join(", ")))
        }
    }

    /// A failed quiz reported together with a zeroed progress counter resets
    /// the watched videos. Only the submitted values are consulted.
    fn resets_videos(&self) -> bool {
        self.quiz_passed == Some(false) && self.training_progress == Some(0)
    }
}

/// Meeting slot supplied by an administrator.
///
/// The slot is checked for presence only; it is not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequest {
    #[schema(example = "2024-05-01")]
    pub meeting_date: Option<String>,
    #[schema(example = "14:30")]
    pub meeting_time: Option<String>,
}

/// Returned when a meeting request lacks a date or a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Please provide meeting date and time")]
pub struct MissingMeetingSlot;

impl MeetingRequest {
    pub fn validate(&self) -> Result<(), MissingMeetingSlot> {
        let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());
        if present(self.meeting_date.as_deref()) && present(self.meeting_time.as_deref()) {
            Ok(())
        } else {
            Err(MissingMeetingSlot)
        }
    }
}

/// Composite of a user's training, quiz, meeting and access fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub training_progress: u32,
    pub videos_watched: BTreeSet<VideoId>,
    pub quiz_passed: bool,
    pub meeting_scheduled: bool,
    pub dashboard_access: bool,
}

impl WorkflowState {
    /// State granted to the bootstrap administrator.
    pub fn completed() -> Self {
        Self {
            training_progress: 3,
            videos_watched: [VideoId(1), VideoId(2), VideoId(3)].into_iter().collect(),
            quiz_passed: true,
            meeting_scheduled: true,
            dashboard_access: true,
        }
    }

    pub fn stage(&self) -> WorkflowStage {
        if self.dashboard_access {
            WorkflowStage::DashboardGranted
        } else if self.meeting_scheduled {
            WorkflowStage::MeetingScheduled
        } else if self.quiz_passed {
            WorkflowStage::QuizPassed
        } else if self.training_progress > 0 || !self.videos_watched.is_empty() {
            WorkflowStage::Training
        } else {
            WorkflowStage::Registered
        }
    }

    /// Apply a partial update in place.
    pub fn apply_progress(&mut self, update: &ProgressUpdate) {
        if let Some(progress) = update.training_progress {
            self.training_progress = progress;
        }
        if let Some(passed) = update.quiz_passed {
            self.quiz_passed = passed;
        }
        if let Some(scheduled) = update.meeting_scheduled {
            self.meeting_scheduled = scheduled;
        }
        if let Some(access) = update.dashboard_access {
            self.dashboard_access = access;
        }
        if let Some(video) = update.video_id {
            self.videos_watched.insert(video);
        }
        if update.resets_videos() {
            self.videos_watched.clear();
        }
    }

    /// Meeting scheduling is unconditional.
    pub fn schedule_meeting(&mut self) {
        self.meeting_scheduled = true;
    }

    pub fn approve_dashboard(&mut self) -> Result<(), WorkflowError> {
        if !self.meeting_scheduled {
            return Err(WorkflowError::MeetingNotScheduled);
        }
        self.dashboard_access = true;
        Ok(())
    }

    /// Passed the quiz but has not been granted the dashboard yet.
    pub fn awaits_review(&self) -> bool {
        self.quiz_passed && !self.dashboard_access
    }
}
