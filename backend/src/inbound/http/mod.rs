//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod body;
pub mod error;
pub mod health;
pub mod leads;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every route and the JSON body-error handler.
///
/// Callers provide `web::Data<HttpState>`, `web::Data<HealthState>` and
/// `web::Data<ServiceInfo>`, wrap the app with the trace middleware and set
/// [`error::route_not_found`] as the default service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(
            web::scope("/api/auth")
                .service(users::register)
                .service(users::login)
                .service(users::current_user)
                .service(users::update_training)
                .service(
                    web::scope("/admin")
                        .service(admin::list_candidates)
                        .service(admin::schedule_meeting)
                        .service(admin::approve_dashboard),
                ),
        )
        .service(
            web::scope("/api/leads")
                .service(leads::create_lead)
                .service(leads::list_leads)
                .service(leads::lead_stats)
                .service(leads::list_all_leads)
                .service(leads::update_lead_status),
        )
        .service(health::ready)
        .service(health::live)
        .service(health::health)
        .service(health::root);
}
