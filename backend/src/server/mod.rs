//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_http_state;

use std::future::Future;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use leopay::Trace;
#[cfg(debug_assertions)]
use leopay::doc::ApiDoc;
use leopay::inbound::http::configure;
use leopay::inbound::http::error::{internal_error_details, route_not_found};
use leopay::inbound::http::health::{HealthState, ServiceInfo};
use leopay::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    service_info: web::Data<ServiceInfo>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        service_info,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(service_info)
        .wrap(internal_error_details())
        .wrap(Trace)
        .configure(configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(route_not_found))
}

/// Construct an Actix HTTP server around prepared state.
///
/// # Parameters
/// - `health_state`: readiness state flipped once the listener is bound.
/// - `http_state`: ports built by [`build_http_state`].
/// - `service_info`: environment and start time reported by `/` and `/health`.
/// - `config`: provides the bind address.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    service_info: ServiceInfo,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
        service_info: web::Data::new(service_info),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .disable_signals()
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

/// Drain once `signal` resolves: fail liveness first, then stop gracefully.
pub fn drain_on<F>(handle: ServerHandle, health_state: web::Data<HealthState>, signal: F)
where
    F: Future<Output = ()> + 'static,
{
    actix_web::rt::spawn(async move {
        signal.await;
        info!("shutdown requested; draining connections");
        health_state.mark_unhealthy();
        handle.stop(true).await;
    });
}
