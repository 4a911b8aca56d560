//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http` together with the
//! bearer-token security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ErrorBody, ErrorCode, LeadStatus, Role, WorkflowStage};

/// Enrich the generated document with the bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token from POST /api/auth/login. The `token` cookie is also accepted.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Leopay API",
        description = "Hunter onboarding workflow and referral lead tracking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_training,
        crate::inbound::http::admin::list_candidates,
        crate::inbound::http::admin::schedule_meeting,
        crate::inbound::http::admin::approve_dashboard,
        crate::inbound::http::leads::create_lead,
        crate::inbound::http::leads::list_leads,
        crate::inbound::http::leads::lead_stats,
        crate::inbound::http::leads::list_all_leads,
        crate::inbound::http::leads::update_lead_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::health,
        crate::inbound::http::health::root,
    ),
    components(schemas(ErrorBody, ErrorCode, Role, WorkflowStage, LeadStatus)),
    tags(
        (name = "auth", description = "Registration, login and training progress"),
        (name = "admin", description = "Administrator workflow transitions"),
        (name = "leads", description = "Referral leads and commission"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
