//! Tests for the user workflow service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::domain::ports::{MockTokenService, MockUserRepository};
use crate::domain::{ErrorCode, PasswordHash, VideoId};
use crate::outbound::memory::InMemoryUserRepository;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

/// Salts with a counter so equal inputs hash differently.
#[derive(Default)]
struct CountingHasher {
    calls: AtomicUsize,
}

impl CredentialHasher for CountingHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHashError> {
        let salt = self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(PasswordHash::new(format!("{salt}${plaintext}")))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError> {
        Ok(hash
            .as_str()
            .split_once('$')
            .is_some_and(|(_, stored)| stored == plaintext))
    }
}

/// Tokens are the user id prefixed with `t-`.
struct PrefixTokens;

impl TokenService for PrefixTokens {
    fn issue(&self, user: &UserId) -> Result<String, TokenError> {
        Ok(format!("t-{user}"))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        match token.strip_prefix("t-") {
            Some("expired") => Err(TokenError::expired()),
            Some(raw) => raw
                .parse()
                .map_err(|_| TokenError::invalid("bad subject")),
            None => Err(TokenError::invalid("bad prefix")),
        }
    }
}

type Service = UserWorkflowService<InMemoryUserRepository, CountingHasher, PrefixTokens>;

#[fixture]
fn service() -> Service {
    UserWorkflowService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(CountingHasher::default()),
        Arc::new(PrefixTokens),
        Arc::new(DefaultClock),
    )
}

fn registration(email: &str) -> Registration {
    Registration::try_from_parts(Some("Ada"), Some(email), Some("secret1"), Some("555-0100"))
        .expect("valid registration")
}

fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, password).expect("credentials shape")
}

fn admin_account() -> AdminAccount {
    AdminAccount {
        name: "Admin".to_owned(),
        email: EmailAddress::parse("admin@leopay.test").expect("valid email"),
        password: Zeroizing::new("admin123".to_owned()),
    }
}

#[rstest]
#[tokio::test]
async fn register_applies_defaults_and_issues_token(service: Service) {
    let session = service
        .register(registration("ada@example.com"))
        .await
        .expect("register");
    assert_eq!(session.user.role, Role::User);
    assert!(!session.user.dashboard_access);
    assert_eq!(session.user.training_progress, 0);
    assert!(session.user.videos_watched.is_empty());
    assert!(!session.user.quiz_passed);
    assert!(!session.user.meeting_scheduled);
    assert_eq!(session.token, format!("t-{}", session.user.id));
}

#[rstest]
#[tokio::test]
async fn duplicate_email_conflicts_case_insensitively(service: Service) {
    service
        .register(registration("ada@example.com"))
        .await
        .expect("first registration");
    let err = service
        .register(registration("ADA@Example.com"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "User with this email already exists");
}

#[rstest]
#[tokio::test]
async fn racing_registration_maps_storage_duplicate_to_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_insert()
        .returning(|user| Err(UserPersistenceError::duplicate_email(user.email.as_ref())));
    let service = UserWorkflowService::new(
        Arc::new(users),
        Arc::new(CountingHasher::default()),
        Arc::new(PrefixTokens),
        Arc::new(DefaultClock),
    );

    let err = service
        .register(registration("ada@example.com"))
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn unknown_email_and_wrong_password_fail_identically(service: Service) {
    service
        .register(registration("ada@example.com"))
        .await
        .expect("register");

    let wrong_password = service
        .authenticate(&credentials("ada@example.com", "nope-nope"))
        .await
        .expect_err("wrong password");
    let unknown_email = service
        .authenticate(&credentials("ghost@example.com", "secret1"))
        .await
        .expect_err("unknown email");

    assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong_password.code(), unknown_email.code());
    assert_eq!(wrong_password.message(), unknown_email.message());
    assert_eq!(wrong_password.message(), "Invalid credentials");
}

#[rstest]
#[tokio::test]
async fn authenticate_accepts_mixed_case_email(service: Service) {
    service
        .register(registration("ada@example.com"))
        .await
        .expect("register");
    let session = service
        .authenticate(&credentials(" Ada@Example.com ", "secret1"))
        .await
        .expect("login");
    assert_eq!(session.user.email.as_ref(), "ada@example.com");
}

#[rstest]
#[tokio::test]
async fn progress_updates_persist(service: Service) {
    let session = service
        .register(registration("ada@example.com"))
        .await
        .expect("register");
    let update = ProgressUpdate {
        video_id: Some(VideoId(5)),
        ..ProgressUpdate::default()
    };
    service
        .update_progress(&session.user.id, &update)
        .await
        .expect("first update");
    let profile = service
        .update_progress(&session.user.id, &update)
        .await
        .expect("second update");
    assert_eq!(profile.videos_watched, vec![VideoId(5)]);

    let reset = ProgressUpdate {
        quiz_passed: Some(false),
        training_progress: Some(0),
        video_id: Some(VideoId(7)),
        ..ProgressUpdate::default()
    };
    let profile = service
        .update_progress(&session.user.id, &reset)
        .await
        .expect("reset");
    assert!(profile.videos_watched.is_empty());

    let stored = service.profile(&session.user.id).await.expect("profile");
    assert!(stored.videos_watched.is_empty());
}

#[rstest]
#[tokio::test]
async fn oversized_progress_is_rejected_before_lookup() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();
    users.expect_update().never();
    let service = UserWorkflowService::new(
        Arc::new(users),
        Arc::new(CountingHasher::default()),
        Arc::new(PrefixTokens),
        Arc::new(DefaultClock),
    );
    let update = ProgressUpdate {
        training_progress: Some(3_000_000_000),
        ..ProgressUpdate::default()
    };

    let err = service
        .update_progress(&UserId::random(), &update)
        .await
        .expect_err("out of range");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Training progress is out of range");
}

#[rstest]
#[tokio::test]
async fn progress_for_missing_user_is_not_found(service: Service) {
    let err = service
        .update_progress(&UserId::random(), &ProgressUpdate::default())
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}

#[rstest]
#[tokio::test]
async fn approval_requires_scheduled_meeting(service: Service) {
    let session = service
        .register(registration("ada@example.com"))
        .await
        .expect("register");
    let id = session.user.id;

    let err = service.approve_dashboard(&id).await.expect_err("too early");
    assert_eq!(err.code(), ErrorCode::PreconditionFailed);
    assert_eq!(
        err.message(),
        "Meeting must be scheduled before approving dashboard access"
    );

    let slot = MeetingRequest {
        meeting_date: Some("2024-05-01".to_owned()),
        meeting_time: Some("14:30".to_owned()),
    };
    let scheduled = service.schedule_meeting(&id, &slot).await.expect("schedule");
    assert!(scheduled.meeting_scheduled);

    let approved = service.approve_dashboard(&id).await.expect("approve");
    assert!(approved.dashboard_access);
}

#[rstest]
#[tokio::test]
async fn schedule_validates_before_lookup(service: Service) {
    let err = service
        .schedule_meeting(&UserId::random(), &MeetingRequest::default())
        .await
        .expect_err("missing slot");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Please provide meeting date and time");

    let slot = MeetingRequest {
        meeting_date: Some("2024-05-01".to_owned()),
        meeting_time: Some("14:30".to_owned()),
    };
    let err = service
        .schedule_meeting(&UserId::random(), &slot)
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn candidates_only_include_hunters_awaiting_review(service: Service) {
    let waiting = service
        .register(registration("waiting@example.com"))
        .await
        .expect("register");
    let fresh = service
        .register(registration("fresh@example.com"))
        .await
        .expect("register");
    let passed = ProgressUpdate {
        quiz_passed: Some(true),
        ..ProgressUpdate::default()
    };
    service
        .update_progress(&waiting.user.id, &passed)
        .await
        .expect("pass quiz");
    service
        .bootstrap_admin(&admin_account())
        .await
        .expect("bootstrap");

    let candidates = service.list_candidates().await.expect("candidates");
    let ids: Vec<UserId> = candidates.iter().map(|profile| profile.id).collect();
    assert_eq!(ids, vec![waiting.user.id]);
    assert!(!ids.contains(&fresh.user.id));
}

#[rstest]
#[tokio::test]
async fn bootstrap_creates_then_reconciles_admin(service: Service) {
    let outcome = service
        .bootstrap_admin(&admin_account())
        .await
        .expect("create");
    assert_eq!(outcome, AdminBootstrap::Created);

    let session = service
        .authenticate(&credentials("admin@leopay.test", "admin123"))
        .await
        .expect("admin login");
    assert_eq!(session.user.role, Role::Admin);
    assert!(session.user.dashboard_access);
    assert_eq!(session.user.training_progress, 3);
    assert_eq!(
        session.user.videos_watched,
        vec![VideoId(1), VideoId(2), VideoId(3)]
    );

    let mut rotated = admin_account();
    rotated.password = Zeroizing::new("rotated-pass".to_owned());
    let outcome = service.bootstrap_admin(&rotated).await.expect("reconcile");
    assert_eq!(outcome, AdminBootstrap::PasswordReconciled);

    assert!(
        service
            .authenticate(&credentials("admin@leopay.test", "admin123"))
            .await
            .is_err()
    );
    let session = service
        .authenticate(&credentials("admin@leopay.test", "rotated-pass"))
        .await
        .expect("rotated login");
    assert_eq!(session.user.role, Role::Admin);
}

#[rstest]
#[tokio::test]
async fn reconcile_overwrites_only_the_hash() {
    let existing = User::register(
        "Renamed".to_owned(),
        EmailAddress::parse("admin@leopay.test").expect("valid email"),
        "555".to_owned(),
        PasswordHash::new("0$old"),
        chrono::Utc::now(),
    );
    let expected_id = existing.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(existing)));
    users
        .expect_update()
        .withf(move |user| {
            user.id == expected_id
                && user.name == "Renamed"
                && user.role == Role::User
                && user.password_hash.as_str().ends_with("$admin123")
        })
        .times(1)
        .returning(|_| Ok(()));
    users.expect_insert().never();

    let service = UserWorkflowService::new(
        Arc::new(users),
        Arc::new(CountingHasher::default()),
        Arc::new(PrefixTokens),
        Arc::new(DefaultClock),
    );
    let outcome = service
        .bootstrap_admin(&admin_account())
        .await
        .expect("reconcile");
    assert_eq!(outcome, AdminBootstrap::PasswordReconciled);
}

#[rstest]
#[case("garbage")]
#[case("t-expired")]
#[case("t-not-a-uuid")]
#[tokio::test]
async fn bad_tokens_resolve_to_uniform_unauthorized(service: Service, #[case] token: &str) {
    let err = service.resolve(token).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), NOT_AUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn token_for_missing_user_is_unauthorized(service: Service) {
    let err = service
        .resolve(&format!("t-{}", UserId::random()))
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), NOT_AUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn valid_token_resolves_user(service: Service) {
    let session = service
        .register(registration("ada@example.com"))
        .await
        .expect("register");
    let user = service.resolve(&session.token).await.expect("resolve");
    assert_eq!(user.id, session.user.id);
}

#[rstest]
#[tokio::test]
async fn unreachable_store_is_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|_| Err(UserPersistenceError::connection("refused")));
    let service = UserWorkflowService::new(
        Arc::new(users),
        Arc::new(CountingHasher::default()),
        Arc::new(PrefixTokens),
        Arc::new(DefaultClock),
    );
    let err = service
        .profile(&UserId::random())
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn signing_failure_is_internal() {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .returning(|_| Err(TokenError::signing("bad key")));
    let service = UserWorkflowService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(CountingHasher::default()),
        Arc::new(tokens),
        Arc::new(DefaultClock),
    );
    let err = service
        .register(registration("ada@example.com"))
        .await
        .expect_err("signing");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
