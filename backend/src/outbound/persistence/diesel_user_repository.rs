//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, Role, User, UserId, VideoId, WorkflowState};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: &diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn to_db_int(value: u32, field: &str) -> Result<i32, UserPersistenceError> {
    i32::try_from(value)
        .map_err(|_| UserPersistenceError::query(format!("{field} out of range: {value}")))
}

fn videos_for_db(state: &WorkflowState) -> Result<Vec<i32>, UserPersistenceError> {
    state
        .videos_watched
        .iter()
        .map(|video| to_db_int(video.0, "video id"))
        .collect()
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let role: Role = row.role.parse().map_err(UserPersistenceError::query)?;
    let training_progress = u32::try_from(row.training_progress).map_err(|_| {
        UserPersistenceError::query(format!(
            "negative training progress for user {}",
            row.id
        ))
    })?;
    let videos_watched = row
        .videos_watched
        .into_iter()
        .map(|id| {
            u32::try_from(id)
                .map(VideoId)
                .map_err(|_| UserPersistenceError::query(format!("negative video id {id}")))
        })
        .collect::<Result<_, _>>()?;

    Ok(User {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: EmailAddress::from_trusted(row.email),
        phone: row.phone,
        password_hash: PasswordHash::new(row.password_hash),
        role,
        workflow: WorkflowState {
            training_progress,
            videos_watched,
            quiz_passed: row.quiz_passed,
            meeting_scheduled: row.meeting_scheduled,
            dashboard_access: row.dashboard_access,
        },
        created_at: row.created_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            name: &user.name,
            email: user.email.as_ref(),
            phone: &user.phone,
            password_hash: user.password_hash.as_str(),
            role: user.role.as_str(),
            training_progress: to_db_int(user.workflow.training_progress, "training progress")?,
            videos_watched: videos_for_db(&user.workflow)?,
            quiz_passed: user.workflow.quiz_passed,
            meeting_scheduled: user.workflow.meeting_scheduled,
            dashboard_access: user.workflow.dashboard_access,
            created_at: user.created_at,
            updated_at: self.clock.utc(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(user.email.as_ref())
                } else {
                    diesel_error(&err)
                }
            })
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = UserUpdate {
            name: &user.name,
            phone: &user.phone,
            password_hash: user.password_hash.as_str(),
            training_progress: to_db_int(user.workflow.training_progress, "training progress")?,
            videos_watched: videos_for_db(&user.workflow)?,
            quiz_passed: user.workflow.quiz_passed,
            meeting_scheduled: user.workflow.meeting_scheduled,
            dashboard_access: user.workflow.dashboard_access,
            updated_at: self.clock.utc(),
        };

        let affected = diesel::update(users::table.find(user.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        if affected == 0 {
            return Err(UserPersistenceError::missing(user.id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;
        row.map(row_to_user).transpose()
    }

    async fn list_candidates(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::quiz_passed.eq(true))
            .filter(users::dashboard_access.eq(false))
            .filter(users::role.eq(Role::User.as_str()))
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        rows.into_iter().map(row_to_user).collect()
    }
}
