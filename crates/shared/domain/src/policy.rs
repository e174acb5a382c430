//! Role-based authorization policy.
//!
//! A pure decision over `(role, operation, resource owner, caller)`. No IO; the
//! orchestrator loads the resource owner first when [`requires_owner`] says the
//! answer depends on it.

use std::fmt;

use uuid::Uuid;

use crate::role::Role;

/// Every guarded action in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create, read, list, update, rotate password, delete, restore, block, unblock users
    ManageUsers,
    /// Create a pass for the given owner
    CreatePass,
    /// Read, update, delete or restore a single pass
    AccessPass,
    /// Search by plate or list every pass
    SearchPasses,
    ListOwnedPasses,
    /// Record an entry or exit
    LogEntry,
    /// Read the entry log of a pass
    ViewEntryLogs,
    /// Choose a pass status other than the default
    SetPassStatus,
    CreateGuestRequest,
    /// Read, update, delete or restore a single guest request
    AccessGuestRequest,
    ListGuestRequests,
    ListOwnedGuestRequests,
    /// Choose a guest request status other than the default
    SetGuestStatus,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::ManageUsers,
        Operation::CreatePass,
        Operation::AccessPass,
        Operation::SearchPasses,
        Operation::ListOwnedPasses,
        Operation::LogEntry,
        Operation::ViewEntryLogs,
        Operation::SetPassStatus,
        Operation::CreateGuestRequest,
        Operation::AccessGuestRequest,
        Operation::ListGuestRequests,
        Operation::ListOwnedGuestRequests,
        Operation::SetGuestStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ManageUsers => "manage_users",
            Operation::CreatePass => "create_pass",
            Operation::AccessPass => "access_pass",
            Operation::SearchPasses => "search_passes",
            Operation::ListOwnedPasses => "list_owned_passes",
            Operation::LogEntry => "log_entry",
            Operation::ViewEntryLogs => "view_entry_logs",
            Operation::SetPassStatus => "set_pass_status",
            Operation::CreateGuestRequest => "create_guest_request",
            Operation::AccessGuestRequest => "access_guest_request",
            Operation::ListGuestRequests => "list_guest_requests",
            Operation::ListOwnedGuestRequests => "list_owned_guest_requests",
            Operation::SetGuestStatus => "set_guest_status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `role` may perform `op`.
///
/// `resource_owner_id` is the owning user of the targeted resource (pass owner,
/// guest request resident). Ownership-scoped decisions deny when it is absent.
pub fn allowed(role: Role, op: Operation, resource_owner_id: Option<Uuid>, caller_id: Uuid) -> bool {
    use Operation::*;

    let owns = resource_owner_id == Some(caller_id);

    match role {
        Role::Admin => true,
        Role::Guard => matches!(op, SearchPasses | LogEntry | ViewEntryLogs),
        Role::Resident => match op {
            CreatePass
            | AccessPass
            | ListOwnedPasses
            | ViewEntryLogs
            | CreateGuestRequest
            | AccessGuestRequest
            | ListOwnedGuestRequests => owns,
            ManageUsers
            | SearchPasses
            | LogEntry
            | SetPassStatus
            | ListGuestRequests
            | SetGuestStatus => false,
        },
    }
}

/// True when the decision for `(role, op)` depends on the resource owner.
pub fn requires_owner(role: Role, op: Operation) -> bool {
    use Operation::*;

    match role {
        Role::Admin | Role::Guard => false,
        Role::Resident => matches!(
            op,
            CreatePass
                | AccessPass
                | ListOwnedPasses
                | ViewEntryLogs
                | CreateGuestRequest
                | AccessGuestRequest
                | ListOwnedGuestRequests
        ),
    }
}
