//! Tests for lead handlers.

use super::*;
use crate::domain::{HunterSummary, LeadStatus, User};
use crate::inbound::http::test_utils::{MockPorts, admin_user, hunter_user, registered_at};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn draft() -> LeadDraft {
    LeadDraft {
        client_name: Some("Acme Ltd".to_owned()),
        email: Some("ops@acme.test".to_owned()),
        phone: Some("555-0100".to_owned()),
        business_type: Some("Retail".to_owned()),
        project_requirements: Some("Storefront".to_owned()),
        budget: Some("5000".to_owned()),
        ..LeadDraft::default()
    }
}

fn lead_for(hunter: &User, draft: LeadDraft) -> Lead {
    let fields = draft.validate().expect("valid draft");
    Lead::create(hunter.id, fields, registered_at())
}

async fn call(ports: MockPorts, req: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .service(
                web::scope("/api/leads")
                    .service(create_lead)
                    .service(list_leads)
                    .service(lead_stats)
                    .service(list_all_leads)
                    .service(update_lead_status),
            ),
    )
    .await;
    let req = req.insert_header((header::AUTHORIZATION, "Bearer t"));
    let res = actix_test::call_service(&app, req.to_request()).await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn create_assigns_caller_as_hunter(draft: LeadDraft) {
    let hunter = hunter_user();
    let hunter_id = hunter.id;
    let created = lead_for(&hunter, draft.clone());
    let mut ports = MockPorts::signed_in_as(hunter);
    ports
        .leads
        .expect_create()
        .withf(move |owner, _| *owner == hunter_id)
        .times(1)
        .returning(move |_, _| Ok(created.clone()));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post().uri("/api/leads").set_json(json!({
            "clientName": "Acme Ltd",
            "email": "ops@acme.test",
            "phone": "555-0100",
            "businessType": "Retail",
            "projectRequirements": "Storefront",
            "budget": "5000"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["lead"]["status"], "pending");
    assert_eq!(body["lead"]["commissionRate"], 0.5);
    assert_eq!(body["lead"]["hunterId"], hunter_id.to_string());
    assert!(body["lead"].get("companyName").is_none());
}

#[actix_web::test]
async fn create_surfaces_validation_message() {
    let mut ports = MockPorts::signed_in_as(hunter_user());
    ports
        .leads
        .expect_create()
        .returning(|_, draft| {
            Err(Error::invalid_request(
                draft.validate().err().unwrap_or_default(),
            ))
        });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/leads")
            .set_json(json!({"clientName": "Acme"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("Please provide"))
    );
}

#[rstest]
#[actix_web::test]
async fn list_counts_own_leads(draft: LeadDraft) {
    let hunter = hunter_user();
    let leads = vec![lead_for(&hunter, draft.clone()), lead_for(&hunter, draft)];
    let mut ports = MockPorts::signed_in_as(hunter);
    ports
        .leads
        .expect_list_for_hunter()
        .returning(move |_| Ok(leads.clone()));

    let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/leads")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["leads"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn stats_wraps_figures() {
    let mut ports = MockPorts::signed_in_as(hunter_user());
    ports.leads.expect_stats().returning(|_| {
        Ok(LeadStats {
            total_leads: 2,
            converted_leads: 1,
            total_earnings: 1000.0,
        })
    });

    let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/leads/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "stats": {"totalLeads": 2, "convertedLeads": 1, "totalEarnings": 1000.0}
        })
    );
}

#[rstest]
#[actix_web::test]
async fn all_leads_is_admin_only() {
    let mut ports = MockPorts::signed_in_as(hunter_user());
    ports.leads.expect_list_all().never();

    let (status, _) = call(ports, actix_test::TestRequest::get().uri("/api/leads/all")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn all_leads_include_hunter(draft: LeadDraft) {
    let hunter = hunter_user();
    let joined = LeadWithHunter {
        lead: lead_for(&hunter, draft),
        hunter: HunterSummary {
            id: hunter.id,
            name: hunter.name.clone(),
            email: hunter.email.clone(),
        },
    };
    let mut ports = MockPorts::signed_in_as(admin_user());
    ports
        .leads
        .expect_list_all()
        .returning(move || Ok(vec![joined.clone()]));

    let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/leads/all")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["leads"][0]["hunter"]["name"], "Grace Hopper");
    assert_eq!(body["leads"][0]["clientName"], "Acme Ltd");
}

#[rstest]
#[actix_web::test]
async fn status_update_forwards_change(draft: LeadDraft) {
    let hunter = hunter_user();
    let mut lead = lead_for(&hunter, draft);
    let lead_id = lead.id;
    lead.transition(LeadStatus::Completed, Some(2000.0), registered_at());
    let mut ports = MockPorts::signed_in_as(admin_user());
    ports
        .leads
        .expect_update_status()
        .withf(move |id, change| {
            *id == lead_id
                && change.status.as_deref() == Some("completed")
                && change.project_value == Some(2000.0)
        })
        .times(1)
        .returning(move |_, _| Ok(lead.clone()));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!("/api/leads/{lead_id}/status"))
            .set_json(json!({"status": "completed", "projectValue": 2000})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lead"]["commissionEarned"], 1000.0);
    assert_eq!(body["lead"]["status"], "completed");
}

#[actix_web::test]
async fn status_update_with_malformed_id_is_not_found() {
    let mut ports = MockPorts::signed_in_as(admin_user());
    ports.leads.expect_update_status().never();

    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri("/api/leads/abc/status")
            .set_json(json!({"status": "contacted"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Lead not found");
}
