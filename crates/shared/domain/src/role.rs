//! Closed role set and the caller context derived from a verified token.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_GUARD, ROLE_RESIDENT};
use crate::error::DomainError;

/// Account roles. The set is closed; adding a role means revisiting the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Guard,
    Resident,
}

impl Role {
    /// Every role, in a stable order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Guard, Role::Resident];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Guard => ROLE_GUARD,
            Role::Resident => ROLE_RESIDENT,
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Residents must carry a plot number.
    pub fn requires_plot(&self) -> bool {
        matches!(self, Role::Resident)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_GUARD => Ok(Role::Guard),
            ROLE_RESIDENT => Ok(Role::Resident),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and role of whoever invokes an operation.
///
/// Produced by verifying an access token outside the service layer and passed
/// explicitly to every operation that needs authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub id: Uuid,
    pub role: Role,
}

impl CallerContext {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// The system actor used for bootstrap work. Its writes carry no audit id.
    pub fn system() -> Self {
        Self {
            id: Uuid::nil(),
            role: Role::Admin,
        }
    }

    pub fn is_system(&self) -> bool {
        self.id.is_nil()
    }

    /// Value for `created_by` / `updated_by` columns.
    pub fn audit_id(&self) -> Option<Uuid> {
        if self.is_system() {
            None
        } else {
            Some(self.id)
        }
    }
}
