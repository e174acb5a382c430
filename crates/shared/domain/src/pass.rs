//! Vehicle pass domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserResponse;

/// Standing vehicle authorization owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    /// Normalized (trimmed, uppercase) plate number
    pub plate_number: String,
    pub vehicle_brand: Option<String>,
    pub vehicle_color: Option<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Pass {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Pass creation input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePass {
    /// Defaults to the caller
    pub owner_user_id: Option<Uuid>,
    pub plate_number: String,
    pub vehicle_brand: Option<String>,
    pub vehicle_color: Option<String>,
    /// Honored only for callers allowed to set statuses
    pub status: Option<String>,
}

/// Pass patch. Absent fields keep their current value; blank optional
/// strings clear the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePass {
    pub plate_number: Option<String>,
    pub vehicle_brand: Option<String>,
    pub vehicle_color: Option<String>,
    pub status: Option<String>,
}

/// A pass together with its owner's public profile, when resolvable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassDetail {
    #[serde(flatten)]
    pub pass: Pass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserResponse>,
}
