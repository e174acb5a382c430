//! Guest visit request domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time-bounded visit authorization tied to a resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRequest {
    pub id: Uuid,
    pub resident_user_id: Uuid,
    pub guest_full_name: String,
    pub plate_number: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl GuestRequest {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// True when `at` falls inside the visit window (both ends inclusive).
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && at <= self.valid_to
    }
}

/// Guest request creation input.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGuestRequest {
    /// Defaults to the caller
    pub resident_user_id: Option<Uuid>,
    pub guest_full_name: String,
    pub plate_number: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    /// Honored only for callers allowed to set statuses
    pub status: Option<String>,
}

/// Guest request patch. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGuestRequest {
    pub guest_full_name: Option<String>,
    pub plate_number: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub status: Option<String>,
}
