//! Health endpoints: liveness and readiness probes, the uptime report, and
//! the root banner.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use actix_web::{HttpResponse, get, http::header, web};
use mockable::Clock;
use serde::Serialize;
use utoipa::ToSchema;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready once the admin account is reconciled.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as draining so liveness checks fail fast.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Process facts reported by `/health` and `/`.
#[derive(Clone)]
pub struct ServiceInfo {
    environment: String,
    started: Instant,
    clock: Arc<dyn Clock>,
}

impl ServiceInfo {
    pub fn new(environment: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            environment: environment.into(),
            started: Instant::now(),
            clock,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    #[schema(example = "ok")]
    pub status: String,
    /// Seconds since the process started serving.
    pub uptime: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Banner {
    pub success: bool,
    #[schema(example = "Leopay API is running")]
    pub message: String,
    #[schema(example = "development")]
    pub environment: String,
    pub version: String,
}

/// Readiness probe. 200 once startup finished, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. 503 once the server starts draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Uptime report", body = HealthReport))
)]
#[get("/health")]
pub async fn health(info: web::Data<ServiceInfo>) -> web::Json<HealthReport> {
    web::Json(HealthReport {
        status: "ok".to_owned(),
        uptime: info.started.elapsed().as_secs_f64(),
        timestamp: info.clock.utc().to_rfc3339(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Service banner", body = Banner))
)]
#[get("/")]
pub async fn root(info: web::Data<ServiceInfo>) -> web::Json<Banner> {
    web::Json(Banner {
        success: true,
        message: "Leopay API is running".to_owned(),
        environment: info.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}
