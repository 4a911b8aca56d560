//! Application settings loaded once at start-up via OrthoConfig.
//!
//! Values layer CLI flags over `LEOPAY_*` environment variables over an
//! optional configuration file. [`AppSettings::validate`] turns the raw
//! values into a [`RuntimeConfig`] whose typed parts are handed to
//! constructors; nothing reads the environment after that.

use std::ffi::OsString;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{AdminAccount, EmailAddress};
use crate::outbound::persistence::PoolConfig;
use crate::outbound::security::JwtConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_JWT_EXPIRE: &str = "7d";
const DEFAULT_ADMIN_EMAIL: &str = "admin@leopay.mockello.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_NAME: &str = "Admin";

/// Deployment flavour. Selects the log format and is echoed by `GET /`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(SettingsError::UnknownEnvironment(other.to_owned())),
        }
    }
}

/// Failures while loading or validating settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(String),
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("unknown environment `{0}`; expected development or production")]
    UnknownEnvironment(String),
    #[error("invalid listen host `{0}`")]
    InvalidHost(String),
    #[error("invalid admin email: {0}")]
    InvalidAdminEmail(String),
}

/// Raw settings as layered by OrthoConfig.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEOPAY")]
pub struct AppSettings {
    /// `development` (default) or `production`.
    pub environment: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it the service keeps data in memory.
    pub database_url: Option<String>,
    pub db_pool_size: Option<u32>,
    pub jwt_secret: Option<String>,
    /// Expiry label echoed to clients as `expiresIn`.
    pub jwt_expire: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: Option<String>,
}

/// Validated configuration split into the pieces each component needs.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub environment: Environment,
    pub bind_addr: SocketAddr,
    pub database: Option<PoolConfig>,
    pub jwt: JwtConfig,
    pub admin: AdminAccount,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl AppSettings {
    /// Load settings from the process arguments, environment and files.
    pub fn load_from_args<I>(args: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::load_from_iter(args).map_err(|err| SettingsError::Load(err.to_string()))
    }

    /// Check required values and convert into typed configuration.
    ///
    /// # Errors
    ///
    /// A blank or missing JWT secret is reported through
    /// [`SettingsError::Missing`]; other failures name the offending value.
    pub fn validate(&self) -> Result<RuntimeConfig, SettingsError> {
        let mut missing = Vec::new();
        let secret = non_blank(self.jwt_secret.as_ref());
        if secret.is_none() {
            missing.push("LEOPAY_JWT_SECRET");
        }
        if !missing.is_empty() {
            return Err(SettingsError::Missing(missing));
        }

        let environment = non_blank(self.environment.as_ref())
            .map(str::parse::<Environment>)
            .transpose()?
            .unwrap_or_default();

        let host = non_blank(self.host.as_ref()).unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|_| SettingsError::InvalidHost(host.to_owned()))?;
        let bind_addr = SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT));

        let database = non_blank(self.database_url.as_ref()).map(|url| {
            PoolConfig::new(url).with_max_size(self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE))
        });

        let jwt = JwtConfig {
            secret: Zeroizing::new(secret.unwrap_or_default().to_owned()),
            expires_in: non_blank(self.jwt_expire.as_ref())
                .unwrap_or(DEFAULT_JWT_EXPIRE)
                .to_owned(),
        };

        let admin_email = non_blank(self.admin_email.as_ref()).unwrap_or(DEFAULT_ADMIN_EMAIL);
        let admin = AdminAccount {
            name: non_blank(self.admin_name.as_ref())
                .unwrap_or(DEFAULT_ADMIN_NAME)
                .to_owned(),
            email: EmailAddress::parse(admin_email)
                .map_err(|err| SettingsError::InvalidAdminEmail(err.to_string()))?,
            password: Zeroizing::new(
                self.admin_password
                    .as_deref()
                    .filter(|raw| !raw.is_empty())
                    .unwrap_or(DEFAULT_ADMIN_PASSWORD)
                    .to_owned(),
            ),
        };

        Ok(RuntimeConfig {
            environment,
            bind_addr,
            database,
            jwt,
            admin,
        })
    }
}
