//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions to and from domain entities
//! live beside the repositories.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{leads, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub training_progress: i32,
    pub videos_watched: Vec<i32>,
    pub quiz_passed: bool,
    pub meeting_scheduled: bool,
    pub dashboard_access: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub training_progress: i32,
    pub videos_watched: Vec<i32>,
    pub quiz_passed: bool,
    pub meeting_scheduled: bool,
    pub dashboard_access: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for persisting a full user record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub training_progress: i32,
    pub videos_watched: Vec<i32>,
    pub quiz_passed: bool,
    pub meeting_scheduled: bool,
    pub dashboard_access: bool,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the leads table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LeadRow {
    pub id: Uuid,
    pub hunter_id: Uuid,
    pub client_name: String,
    pub company_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub address: Option<String>,
    pub business_type: String,
    pub project_requirements: String,
    pub budget: String,
    pub additional_notes: Option<String>,
    pub status: String,
    pub commission_rate: f64,
    pub project_value: f64,
    pub commission_earned: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new lead records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leads)]
pub(crate) struct NewLeadRow<'a> {
    pub id: Uuid,
    pub hunter_id: Uuid,
    pub client_name: &'a str,
    pub company_name: Option<&'a str>,
    pub email: &'a str,
    pub phone: &'a str,
    pub alternate_phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub business_type: &'a str,
    pub project_requirements: &'a str,
    pub budget: &'a str,
    pub additional_notes: Option<&'a str>,
    pub status: &'a str,
    pub commission_rate: f64,
    pub project_value: f64,
    pub commission_earned: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the fields an administrator may change on a lead.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = leads)]
pub(crate) struct LeadUpdate<'a> {
    pub status: &'a str,
    pub project_value: f64,
    pub commission_earned: f64,
    pub updated_at: DateTime<Utc>,
}
