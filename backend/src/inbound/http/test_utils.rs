//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockLeadWorkflow, MockSessionResolver, MockUserAccounts, MockUserAdministration,
};
use crate::domain::{EmailAddress, PasswordHash, Role, User, WorkflowState};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub const EXPIRES_IN: &str = "7d";

pub fn registered_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Regular account fresh from registration.
pub fn hunter_user() -> User {
    User::register(
        "Grace Hopper".to_owned(),
        EmailAddress::parse("grace@example.com").expect("valid email"),
        "+44 20 7946 0000".to_owned(),
        PasswordHash::new("hashed"),
        registered_at(),
    )
}

/// Bootstrapped administrator.
pub fn admin_user() -> User {
    let mut user = User::register(
        "Admin".to_owned(),
        EmailAddress::parse("admin@leopay.mockello.com").expect("valid email"),
        String::new(),
        PasswordHash::new("hashed"),
        registered_at(),
    );
    user.role = Role::Admin;
    user.workflow = WorkflowState::completed();
    user
}

/// Session resolver accepting any token as `user`.
pub fn resolving_to(user: User) -> MockSessionResolver {
    let mut sessions = MockSessionResolver::new();
    sessions
        .expect_resolve()
        .returning(move |_| Ok(user.clone()));
    sessions
}

/// Mocked driving ports, one per handler group.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockUserAccounts,
    pub admin: MockUserAdministration,
    pub sessions: MockSessionResolver,
    pub leads: MockLeadWorkflow,
}

impl MockPorts {
    /// Ports whose resolver authenticates every request as `user`.
    pub fn signed_in_as(user: User) -> Self {
        Self {
            sessions: resolving_to(user),
            ..Self::default()
        }
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(self.accounts),
                admin: Arc::new(self.admin),
                sessions: Arc::new(self.sessions),
                leads: Arc::new(self.leads),
            },
            EXPIRES_IN,
        )
    }
}

pub fn state_with_sessions(sessions: MockSessionResolver) -> HttpState {
    MockPorts {
        sessions,
        ..MockPorts::default()
    }
    .into_state()
}
