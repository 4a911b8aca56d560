//! Builders wiring repositories and services into [`HttpState`].

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use leopay::domain::ports::{LeadRepository, UserRepository};
use leopay::domain::{Error, LeadWorkflowService, UserWorkflowService};
use leopay::inbound::http::state::{HttpState, HttpStatePorts};
use leopay::outbound::memory::{InMemoryLeadRepository, InMemoryUserRepository};
use leopay::outbound::persistence::{DieselLeadRepository, DieselUserRepository};
use leopay::outbound::security::{Argon2Hasher, JwtTokenService};

use super::ServerConfig;

/// Build the HTTP state, reconciling the administrator account first.
///
/// Diesel repositories are used when a pool is configured; otherwise both
/// repositories live in memory and share the same user table.
///
/// # Errors
///
/// Returns the domain error raised while bootstrapping the administrator.
pub async fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<HttpState, Error> {
    match &config.db_pool {
        Some(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone(), clock.clone()));
            let leads = Arc::new(DieselLeadRepository::new(pool.clone()));
            assemble(config, users, leads, clock).await
        }
        None => {
            info!("no database configured; using in-memory repositories");
            let users = Arc::new(InMemoryUserRepository::new());
            let leads = Arc::new(InMemoryLeadRepository::new(users.clone()));
            assemble(config, users, leads, clock).await
        }
    }
}

async fn assemble<U, L>(
    config: &ServerConfig,
    users: Arc<U>,
    leads: Arc<L>,
    clock: Arc<dyn Clock>,
) -> Result<HttpState, Error>
where
    U: UserRepository + 'static,
    L: LeadRepository + 'static,
{
    let tokens = Arc::new(JwtTokenService::new(&config.jwt, clock.clone()));
    let accounts = Arc::new(UserWorkflowService::new(
        users,
        Arc::new(Argon2Hasher),
        tokens,
        clock.clone(),
    ));

    accounts.bootstrap_admin(&config.admin).await?;

    let lead_service = Arc::new(LeadWorkflowService::new(leads, clock));
    Ok(HttpState::new(
        HttpStatePorts {
            accounts: accounts.clone(),
            admin: accounts.clone(),
            sessions: accounts,
            leads: lead_service,
        },
        config.jwt.expires_in.clone(),
    )
    .exposing_internal_details(!config.environment.is_production()))
}
