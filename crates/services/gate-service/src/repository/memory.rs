//! In-memory store for tests and local runs.
//!
//! Mirrors the SeaORM store: unique emails, newest-first ordering, and the
//! same soft-delete visibility rules.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{EntryLog, GuestRequest, Page, Pass, User};

use super::store::{
    GuestRequestUpdate, ListFilter, NewEntryLog, NewGuestRequest, NewPass, NewUser, PassUpdate,
    Store, UserUpdate,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    passes: Vec<Pass>,
    guest_requests: Vec<GuestRequest>,
    entry_logs: Vec<EntryLog>,
}

/// `Store` kept in process memory. Rows are stored in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, filtered, then windowed.
fn select<T, F>(rows: &[T], page: Page, keep: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let matching: Vec<T> = rows.iter().rev().filter(|r| keep(r)).cloned().collect();
    page.slice(&matching).to_vec()
}

fn unique_violation(email: &str) -> AppError {
    AppError::Storage(DbErr::Custom(format!(
        "duplicate key value violates unique constraint \"users_email_key\": {email}"
    )))
}

fn find_mut<T, F>(rows: &mut [T], pred: F) -> Option<&mut T>
where
    F: Fn(&T) -> bool,
{
    rows.iter_mut().find(|r| pred(r))
}

#[async_trait]
impl Store for MemoryStore {
    // Users

    async fn create_user(&self, new: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(unique_violation(&new.email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            full_name: new.full_name,
            plot_number: new.plot_number,
            blocked_at: None,
            created_by: new.created_by,
            updated_by: new.created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.tables.read().await.users.len() as u64)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email && u.is_active())
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id && u.is_active()).cloned())
    }

    async fn find_user_with_deleted(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self, filter: ListFilter) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.users, filter.page, |u| {
            filter.include_deleted || u.is_active()
        }))
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id != id && u.email == update.email)
        {
            return Err(unique_violation(&update.email));
        }
        Ok(find_mut(&mut tables.users, |u| u.id == id && u.is_active()).map(|user| {
            user.email = update.email;
            user.role = update.role;
            user.full_name = update.full_name;
            user.plot_number = update.plot_number;
            if let Some(hash) = update.password_hash {
                user.password_hash = hash;
            }
            user.updated_by = update.updated_by;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_user_password(
        &self,
        id: Uuid,
        password_hash: String,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.users, |u| u.id == id && u.is_active()).map(|user| {
            user.password_hash = password_hash;
            user.updated_by = updated_by;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn soft_delete_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.users, |u| u.id == id).map(|user| {
            let now = Utc::now();
            user.deleted_at = user.deleted_at.or(Some(now));
            user.updated_by = updated_by;
            user.updated_at = now;
            user.clone()
        }))
    }

    async fn restore_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.users, |u| u.id == id).map(|user| {
            user.deleted_at = None;
            user.updated_by = updated_by;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn block_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.users, |u| u.id == id && u.is_active()).map(|user| {
            let now = Utc::now();
            user.blocked_at = user.blocked_at.or(Some(now));
            user.updated_by = updated_by;
            user.updated_at = now;
            user.clone()
        }))
    }

    async fn unblock_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.users, |u| u.id == id && u.is_active()).map(|user| {
            user.blocked_at = None;
            user.updated_by = updated_by;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    // Passes

    async fn create_pass(&self, new: NewPass) -> AppResult<Pass> {
        let now = Utc::now();
        let pass = Pass {
            id: Uuid::new_v4(),
            owner_user_id: new.owner_user_id,
            plate_number: new.plate_number,
            vehicle_brand: new.vehicle_brand,
            vehicle_color: new.vehicle_color,
            status: new.status,
            created_by: new.created_by,
            updated_by: new.created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().await.passes.push(pass.clone());
        Ok(pass)
    }

    async fn find_pass(&self, id: Uuid) -> AppResult<Option<Pass>> {
        let tables = self.tables.read().await;
        Ok(tables.passes.iter().find(|p| p.id == id && !p.is_deleted()).cloned())
    }

    async fn find_pass_with_deleted(&self, id: Uuid) -> AppResult<Option<Pass>> {
        let tables = self.tables.read().await;
        Ok(tables.passes.iter().find(|p| p.id == id).cloned())
    }

    async fn list_passes(&self, filter: ListFilter) -> AppResult<Vec<Pass>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.passes, filter.page, |p| {
            filter.include_deleted || !p.is_deleted()
        }))
    }

    async fn list_passes_by_owner(&self, owner_user_id: Uuid, filter: ListFilter) -> AppResult<Vec<Pass>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.passes, filter.page, |p| {
            p.owner_user_id == owner_user_id && (filter.include_deleted || !p.is_deleted())
        }))
    }

    async fn search_passes_by_plate(&self, plate: &str, page: Page) -> AppResult<Vec<Pass>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.passes, page, |p| {
            !p.is_deleted() && p.plate_number.contains(plate)
        }))
    }

    async fn update_pass(&self, id: Uuid, update: PassUpdate) -> AppResult<Option<Pass>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.passes, |p| p.id == id && !p.is_deleted()).map(|pass| {
            pass.plate_number = update.plate_number;
            pass.vehicle_brand = update.vehicle_brand;
            pass.vehicle_color = update.vehicle_color;
            pass.status = update.status;
            pass.updated_by = update.updated_by;
            pass.updated_at = Utc::now();
            pass.clone()
        }))
    }

    async fn soft_delete_pass(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<Pass>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.passes, |p| p.id == id).map(|pass| {
            let now = Utc::now();
            pass.deleted_at = pass.deleted_at.or(Some(now));
            pass.updated_by = updated_by;
            pass.updated_at = now;
            pass.clone()
        }))
    }

    async fn restore_pass(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<Pass>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.passes, |p| p.id == id).map(|pass| {
            pass.deleted_at = None;
            pass.updated_by = updated_by;
            pass.updated_at = Utc::now();
            pass.clone()
        }))
    }

    // Guest requests

    async fn create_guest_request(&self, new: NewGuestRequest) -> AppResult<GuestRequest> {
        let now = Utc::now();
        let request = GuestRequest {
            id: Uuid::new_v4(),
            resident_user_id: new.resident_user_id,
            guest_full_name: new.guest_full_name,
            plate_number: new.plate_number,
            valid_from: new.valid_from,
            valid_to: new.valid_to,
            status: new.status,
            created_by: new.created_by,
            updated_by: new.created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().await.guest_requests.push(request.clone());
        Ok(request)
    }

    async fn find_guest_request(&self, id: Uuid) -> AppResult<Option<GuestRequest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .guest_requests
            .iter()
            .find(|g| g.id == id && !g.is_deleted())
            .cloned())
    }

    async fn find_guest_request_with_deleted(&self, id: Uuid) -> AppResult<Option<GuestRequest>> {
        let tables = self.tables.read().await;
        Ok(tables.guest_requests.iter().find(|g| g.id == id).cloned())
    }

    async fn list_guest_requests(&self, filter: ListFilter) -> AppResult<Vec<GuestRequest>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.guest_requests, filter.page, |g| {
            filter.include_deleted || !g.is_deleted()
        }))
    }

    async fn list_guest_requests_by_resident(
        &self,
        resident_user_id: Uuid,
        filter: ListFilter,
    ) -> AppResult<Vec<GuestRequest>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.guest_requests, filter.page, |g| {
            g.resident_user_id == resident_user_id && (filter.include_deleted || !g.is_deleted())
        }))
    }

    async fn update_guest_request(
        &self,
        id: Uuid,
        update: GuestRequestUpdate,
    ) -> AppResult<Option<GuestRequest>> {
        let mut tables = self.tables.write().await;
        Ok(
            find_mut(&mut tables.guest_requests, |g| g.id == id && !g.is_deleted()).map(|request| {
                request.guest_full_name = update.guest_full_name;
                request.plate_number = update.plate_number;
                request.valid_from = update.valid_from;
                request.valid_to = update.valid_to;
                request.status = update.status;
                request.updated_by = update.updated_by;
                request.updated_at = Utc::now();
                request.clone()
            }),
        )
    }

    async fn soft_delete_guest_request(
        &self,
        id: Uuid,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<GuestRequest>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.guest_requests, |g| g.id == id).map(|request| {
            let now = Utc::now();
            request.deleted_at = request.deleted_at.or(Some(now));
            request.updated_by = updated_by;
            request.updated_at = now;
            request.clone()
        }))
    }

    async fn restore_guest_request(
        &self,
        id: Uuid,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<GuestRequest>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.guest_requests, |g| g.id == id).map(|request| {
            request.deleted_at = None;
            request.updated_by = updated_by;
            request.updated_at = Utc::now();
            request.clone()
        }))
    }

    // Entry logs

    async fn create_entry_log(&self, new: NewEntryLog) -> AppResult<EntryLog> {
        let entry = EntryLog {
            id: Uuid::new_v4(),
            pass_id: new.pass_id,
            guard_user_id: new.guard_user_id,
            action: new.action,
            comment: new.comment,
            action_at: Utc::now(),
        };
        self.tables.write().await.entry_logs.push(entry.clone());
        Ok(entry)
    }

    async fn list_entry_logs_by_pass(&self, pass_id: Uuid, page: Page) -> AppResult<Vec<EntryLog>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.entry_logs, page, |e| e.pass_id == pass_id))
    }
}
