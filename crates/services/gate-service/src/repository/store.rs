//! Persistence collaborator contract.
//!
//! Lookups and mutations of a single row return `Ok(None)` when no row
//! matched; the orchestrator turns that into `NotFound`. Every other failure
//! surfaces as `AppError::Storage` untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::AppResult;
use domain::{EntryAction, EntryLog, GuestRequest, Page, Pass, Role, User};

#[cfg(test)]
use mockall::automock;

// =============================================================================
// Parameters
// =============================================================================

/// Soft-delete visibility and window for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub include_deleted: bool,
    pub page: Page,
}

impl ListFilter {
    pub fn active(page: Page) -> Self {
        Self {
            include_deleted: false,
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub plot_number: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Full replacement of the mutable user fields. A present `password_hash`
/// is rotated in the same write.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub email: String,
    pub role: Role,
    pub full_name: String,
    pub plot_number: Option<String>,
    pub password_hash: Option<String>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPass {
    pub owner_user_id: Uuid,
    pub plate_number: String,
    pub vehicle_brand: Option<String>,
    pub vehicle_color: Option<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
}

/// Full replacement of the mutable pass fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PassUpdate {
    pub plate_number: String,
    pub vehicle_brand: Option<String>,
    pub vehicle_color: Option<String>,
    pub status: String,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGuestRequest {
    pub resident_user_id: Uuid,
    pub guest_full_name: String,
    pub plate_number: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub status: String,
    pub created_by: Option<Uuid>,
}

/// Full replacement of the mutable guest request fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestRequestUpdate {
    pub guest_full_name: String,
    pub plate_number: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub status: String,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEntryLog {
    pub pass_id: Uuid,
    pub guard_user_id: Uuid,
    pub action: EntryAction,
    pub comment: Option<String>,
}

// =============================================================================
// Store
// =============================================================================

/// Storage operations consumed by the orchestrator.
///
/// `find_*` methods exclude soft-deleted rows; `*_with_deleted` variants
/// include them. Lists are ordered newest first.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
    async fn count_users(&self) -> AppResult<u64>;
    /// Active user by exact email
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_with_deleted(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn list_users(&self, filter: ListFilter) -> AppResult<Vec<User>>;
    /// Updates an active user
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<Option<User>>;
    /// Rotates the credential of an active user
    async fn update_user_password(
        &self,
        id: Uuid,
        password_hash: String,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<User>>;
    async fn soft_delete_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>>;
    async fn restore_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>>;
    async fn block_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>>;
    async fn unblock_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>>;

    // Passes
    async fn create_pass(&self, pass: NewPass) -> AppResult<Pass>;
    async fn find_pass(&self, id: Uuid) -> AppResult<Option<Pass>>;
    async fn find_pass_with_deleted(&self, id: Uuid) -> AppResult<Option<Pass>>;
    async fn list_passes(&self, filter: ListFilter) -> AppResult<Vec<Pass>>;
    async fn list_passes_by_owner(&self, owner_user_id: Uuid, filter: ListFilter) -> AppResult<Vec<Pass>>;
    /// Active passes whose normalized plate contains `plate`
    async fn search_passes_by_plate(&self, plate: &str, page: Page) -> AppResult<Vec<Pass>>;
    /// Updates an active pass
    async fn update_pass(&self, id: Uuid, update: PassUpdate) -> AppResult<Option<Pass>>;
    async fn soft_delete_pass(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<Pass>>;
    async fn restore_pass(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<Pass>>;

    // Guest requests
    async fn create_guest_request(&self, request: NewGuestRequest) -> AppResult<GuestRequest>;
    async fn find_guest_request(&self, id: Uuid) -> AppResult<Option<GuestRequest>>;
    async fn find_guest_request_with_deleted(&self, id: Uuid) -> AppResult<Option<GuestRequest>>;
    async fn list_guest_requests(&self, filter: ListFilter) -> AppResult<Vec<GuestRequest>>;
    async fn list_guest_requests_by_resident(
        &self,
        resident_user_id: Uuid,
        filter: ListFilter,
    ) -> AppResult<Vec<GuestRequest>>;
    /// Updates an active guest request
    async fn update_guest_request(
        &self,
        id: Uuid,
        update: GuestRequestUpdate,
    ) -> AppResult<Option<GuestRequest>>;
    async fn soft_delete_guest_request(
        &self,
        id: Uuid,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<GuestRequest>>;
    async fn restore_guest_request(
        &self,
        id: Uuid,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<GuestRequest>>;

    // Entry logs
    async fn create_entry_log(&self, entry: NewEntryLog) -> AppResult<EntryLog>;
    async fn list_entry_logs_by_pass(&self, pass_id: Uuid, page: Page) -> AppResult<Vec<EntryLog>>;
}
