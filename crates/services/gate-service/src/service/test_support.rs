//! Fixtures shared by the service unit tests.

use std::sync::Arc;

use auth_service_lib::TokenManager;
use chrono::{Duration, Utc};
use common::TokenConfig;
use domain::{CallerContext, GuestRequest, Pass, Password, Role, User};
use uuid::Uuid;

use crate::metrics::{new_registry, GateMetrics};
use crate::repository::MockStore;

use super::GateManager;

pub(crate) fn token_manager() -> TokenManager {
    TokenManager::new(&TokenConfig::new(
        "access-secret-access-secret-access-secret",
        "refresh-secret-refresh-secret-refresh-secret",
    ))
    .unwrap()
}

pub(crate) fn gate(store: MockStore) -> GateManager {
    GateManager::new(
        Arc::new(store),
        Arc::new(token_manager()),
        GateMetrics::new(new_registry()).unwrap(),
    )
}

pub(crate) fn caller(role: Role) -> CallerContext {
    CallerContext::new(Uuid::new_v4(), role)
}

pub(crate) fn user(role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: "resident@example.com".to_string(),
        password_hash: String::new(),
        role,
        full_name: "Test User".to_string(),
        plot_number: role.requires_plot().then(|| "12A".to_string()),
        blocked_at: None,
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub(crate) fn user_with_password(role: Role, password: &str) -> User {
    User {
        password_hash: Password::new(password).unwrap().into_string(),
        ..user(role)
    }
}

pub(crate) fn pass(owner: Uuid) -> Pass {
    let now = Utc::now();
    Pass {
        id: Uuid::new_v4(),
        owner_user_id: owner,
        plate_number: "A123BC77".to_string(),
        vehicle_brand: Some("Lada".to_string()),
        vehicle_color: None,
        status: "active".to_string(),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub(crate) fn guest_request(resident: Uuid) -> GuestRequest {
    let now = Utc::now();
    GuestRequest {
        id: Uuid::new_v4(),
        resident_user_id: resident,
        guest_full_name: "Guest Person".to_string(),
        plate_number: "M001OP199".to_string(),
        valid_from: now,
        valid_to: now + Duration::hours(4),
        status: "pending".to_string(),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
