//! The orchestrator shared by every service trait.
//!
//! Each operation runs validate → authorize → normalize → one store write.
//! Validation and authorization failures return before the store is touched.

use std::sync::Arc;

use auth_service_lib::TokenManager;
use common::{AppError, AppResult};
use domain::validation::normalize_optional;
use domain::{allowed, requires_owner, CallerContext, Operation, Page};
use uuid::Uuid;

use crate::metrics::GateMetrics;
use crate::repository::{ListFilter, Store};

/// Concrete implementation of the gate service traits.
pub struct GateManager {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) tokens: Arc<TokenManager>,
    pub(crate) metrics: GateMetrics,
}

impl GateManager {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenManager>, metrics: GateMetrics) -> Self {
        Self {
            store,
            tokens,
            metrics,
        }
    }

    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }
}

/// Outcome of checking an operation before the resource owner is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Allowed regardless of owner
    Granted,
    /// Depends on the owner; load the resource and call [`authorize`]
    NeedsOwner,
}

fn deny(caller: &CallerContext, op: Operation, owner: Option<Uuid>) -> AppError {
    tracing::warn!(
        caller_id = %caller.id,
        role = %caller.role,
        operation = %op,
        owner_id = ?owner,
        "authorization denied"
    );
    AppError::Forbidden
}

/// Decide `op` for a known (or absent) resource owner.
pub(crate) fn authorize(caller: &CallerContext, op: Operation, owner: Option<Uuid>) -> AppResult<()> {
    if allowed(caller.role, op, owner, caller.id) {
        Ok(())
    } else {
        Err(deny(caller, op, owner))
    }
}

/// Decide `op` as far as possible without reading anything.
pub(crate) fn precheck(caller: &CallerContext, op: Operation) -> AppResult<Access> {
    if requires_owner(caller.role, op) {
        return Ok(Access::NeedsOwner);
    }
    authorize(caller, op, None).map(|_| Access::Granted)
}

/// A requested status survives only when the caller may set it; otherwise
/// `fallback` is used.
pub(crate) fn permitted_status(
    caller: &CallerContext,
    op: Operation,
    requested: Option<String>,
    fallback: String,
) -> String {
    match normalize_optional(requested) {
        Some(status) if allowed(caller.role, op, None, caller.id) => status,
        _ => fallback,
    }
}

/// Patch an optional text field: absent keeps `current`, blank clears.
pub(crate) fn merge_optional(patch: Option<String>, current: Option<String>) -> Option<String> {
    match patch {
        Some(value) => normalize_optional(Some(value)),
        None => current,
    }
}

/// Only admins may look at soft-deleted rows in lists.
pub(crate) fn list_filter(caller: &CallerContext, include_deleted: bool, page: Page) -> ListFilter {
    ListFilter {
        include_deleted: include_deleted && caller.role.is_admin(),
        page,
    }
}
