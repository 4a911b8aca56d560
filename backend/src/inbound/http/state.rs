//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LeadWorkflow, SessionResolver, UserAccounts, UserAdministration};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn UserAccounts>,
    pub admin: Arc<dyn UserAdministration>,
    pub sessions: Arc<dyn SessionResolver>,
    pub leads: Arc<dyn LeadWorkflow>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub admin: Arc<dyn UserAdministration>,
    pub sessions: Arc<dyn SessionResolver>,
    pub leads: Arc<dyn LeadWorkflow>,
    /// Configured token lifetime label echoed to clients as `expiresIn`.
    pub expires_in: String,
    /// Render internal error messages and details instead of redacting them.
    pub expose_internal_details: bool,
}

impl HttpState {
    /// Construct state from ports and the advertised token lifetime.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(ports, "7d");
    /// ```
    pub fn new(ports: HttpStatePorts, expires_in: impl Into<String>) -> Self {
        let HttpStatePorts {
            accounts,
            admin,
            sessions,
            leads,
        } = ports;
        Self {
            accounts,
            admin,
            sessions,
            leads,
            expires_in: expires_in.into(),
            expose_internal_details: false,
        }
    }

    /// Keep internal error detail in responses. Off unless set.
    #[must_use]
    pub fn exposing_internal_details(mut self, expose: bool) -> Self {
        self.expose_internal_details = expose;
        self
    }
}
