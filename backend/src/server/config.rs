//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use leopay::domain::AdminAccount;
use leopay::outbound::persistence::DbPool;
use leopay::outbound::security::JwtConfig;
use leopay::settings::{Environment, RuntimeConfig};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) environment: Environment,
    pub(crate) jwt: JwtConfig,
    pub(crate) admin: AdminAccount,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Take the listener, token and admin settings from validated configuration.
    #[must_use]
    pub fn new(runtime: &RuntimeConfig) -> Self {
        Self {
            bind_addr: runtime.bind_addr,
            environment: runtime.environment,
            jwt: runtime.jwt.clone(),
            admin: runtime.admin.clone(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server keeps users and leads in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
