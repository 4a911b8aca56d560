//! Client leads referred by hunters and their commission arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{EmailAddress, UserId};

/// Stable lead identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(Uuid);

impl LeadId {
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

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LeadId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle status. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    Pending,
    Contacted,
    InProgress,
    Completed,
    Rejected,
}

impl LeadStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Contacted,
        Self::InProgress,
        Self::Completed,
        Self::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the five known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status")]
pub struct InvalidStatus;

impl FromStr for LeadStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(InvalidStatus)
    }
}

/// Fraction of the project value paid to the hunter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CommissionRate(f64);

impl CommissionRate {
    pub const DEFAULT: Self = Self(0.5);

    /// Accepts values in `[0, 1]`.
    pub fn new(rate: f64) -> Option<Self> {
        (0.0..=1.0).contains(&rate).then_some(Self(rate))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Raw lead submission as received from a hunter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    pub client_name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub address: Option<String>,
    pub business_type: Option<String>,
    pub project_requirements: Option<String>,
    pub budget: Option<String>,
    pub additional_notes: Option<String>,
}

/// Validated lead contact and project fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub client_name: String,
    pub company_name: Option<String>,
    pub email: EmailAddress,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub address: Option<String>,
    pub business_type: String,
    pub project_requirements: String,
    pub budget: String,
    pub additional_notes: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

fn required(value: Option<String>, message: &'static str, problems: &mut Vec<String>) -> String {
    trimmed(value).unwrap_or_else(|| {
        problems.push(message.to_owned());
        String::new()
    })
}

impl LeadDraft {
    /// Validate required fields, collecting every failure.
    ///
    /// The error lists each problem in field order joined with `", "`.
    pub fn validate(self) -> Result<NewLead, String> {
        let mut problems = Vec::new();
        let client_name = required(self.client_name, "Please provide a client name", &mut problems);
        let email = match EmailAddress::parse(self.email.as_deref().unwrap_or_default()) {
            Ok(email) => Some(email),
            Err(err) => {
                problems.push(err.to_string());
                None
            }
        };
        let phone = required(self.phone, "Please provide a phone number", &mut problems);
        let business_type = required(
            self.business_type,
            "Please provide a business type",
            &mut problems,
        );
        let project_requirements = required(
            self.project_requirements,
            "Please provide project requirements",
            &mut problems,
        );
        let budget = required(self.budget, "Please provide a budget range", &mut problems);

        match email {
            Some(email) if problems.is_empty() => Ok(NewLead {
                client_name,
                company_name: trimmed(self.company_name),
                email,
                phone,
                alternate_phone: trimmed(self.alternate_phone),
                address: trimmed(self.address),
                business_type,
                project_requirements,
                budget,
                additional_notes: trimmed(self.additional_notes),
            }),
            _ => Err(problems.join(", ")),
        }
    }
}

/// A referred client lead.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[schema(value_type = String)]
    pub id: LeadId,
    #[schema(value_type = String)]
    pub hunter_id: UserId,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub business_type: String,
    pub project_requirements: String,
    pub budget: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    pub status: LeadStatus,
    #[schema(value_type = f64, example = 0.5)]
    pub commission_rate: CommissionRate,
    pub project_value: f64,
    pub commission_earned: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Create a pending lead owned by `hunter_id` at the default rate.
    pub fn create(hunter_id: UserId, fields: NewLead, now: DateTime<Utc>) -> Self {
        Self {
            id: LeadId::random(),
            hunter_id,
            client_name: fields.client_name,
            company_name: fields.company_name,
            email: fields.email,
            phone: fields.phone,
            alternate_phone: fields.alternate_phone,
            address: fields.address,
            business_type: fields.business_type,
            project_requirements: fields.project_requirements,
            budget: fields.budget,
            additional_notes: fields.additional_notes,
            status: LeadStatus::Pending,
            commission_rate: CommissionRate::DEFAULT,
            project_value: 0.0,
            commission_earned: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `status`.
    ///
    /// A completion carrying a positive `project_value` records the value and
    /// recomputes the commission at the lead's fixed rate. Any other
    /// transition leaves both amounts untouched.
    pub fn transition(&mut self, status: LeadStatus, project_value: Option<f64>, now: DateTime<Utc>) {
        self.status = status;
        if status == LeadStatus::Completed {
            if let Some(value) = project_value.filter(|value| *value > 0.0) {
                self.project_value = value;
                self.commission_earned = value * self.commission_rate.value();
            }
        }
        self.updated_at = now;
    }
}

/// Owning hunter's public fields, joined onto leads for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HunterSummary {
    #[schema(value_type = String)]
    pub id: UserId,
    pub name: String,
    #[schema(value_type = String)]
    pub email: EmailAddress,
}

/// Lead together with its hunter.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeadWithHunter {
    #[serde(flatten)]
    pub lead: Lead,
    pub hunter: HunterSummary,
}

/// Aggregate figures for a hunter's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_leads: u64,
    pub converted_leads: u64,
    pub total_earnings: f64,
}

impl LeadStats {
    pub fn from_leads<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> Self {
        leads.into_iter().fold(Self::default(), |mut stats, lead| {
            stats.total_leads += 1;
            if lead.status == LeadStatus::Completed {
                stats.converted_leads += 1;
                stats.total_earnings += lead.commission_earned;
            }
            stats
        })
    }
}
