//! PostgreSQL-backed store using SeaORM, with soft delete support.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use common::AppResult;
use domain::{EntryLog, GuestRequest, Page, Pass, User};

use super::entities::{entry_log, guest_request, pass, user};
use super::store::{
    GuestRequestUpdate, ListFilter, NewEntryLog, NewGuestRequest, NewPass, NewUser, PassUpdate,
    Store, UserUpdate,
};

/// Concrete implementation of `Store` on a SeaORM connection.
#[derive(Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn user_row(&self, id: Uuid, include_deleted: bool) -> Result<Option<user::Model>, DbErr> {
        let mut query = user::Entity::find_by_id(id);
        if !include_deleted {
            query = query.filter(user::Column::DeletedAt.is_null());
        }
        query.one(&self.db).await
    }

    async fn pass_row(&self, id: Uuid, include_deleted: bool) -> Result<Option<pass::Model>, DbErr> {
        let mut query = pass::Entity::find_by_id(id);
        if !include_deleted {
            query = query.filter(pass::Column::DeletedAt.is_null());
        }
        query.one(&self.db).await
    }

    async fn guest_row(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<guest_request::Model>, DbErr> {
        let mut query = guest_request::Entity::find_by_id(id);
        if !include_deleted {
            query = query.filter(guest_request::Column::DeletedAt.is_null());
        }
        query.one(&self.db).await
    }

    /// Apply `change` to the user row matched by `id` and persist it.
    async fn modify_user<F>(&self, id: Uuid, include_deleted: bool, change: F) -> AppResult<Option<User>>
    where
        F: FnOnce(&mut user::ActiveModel, &user::Model) + Send,
    {
        let Some(model) = self.user_row(id, include_deleted).await? else {
            return Ok(None);
        };
        let mut active: user::ActiveModel = model.clone().into();
        change(&mut active, &model);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(Some(User::try_from(model)?))
    }

    async fn modify_pass<F>(&self, id: Uuid, include_deleted: bool, change: F) -> AppResult<Option<Pass>>
    where
        F: FnOnce(&mut pass::ActiveModel, &pass::Model) + Send,
    {
        let Some(model) = self.pass_row(id, include_deleted).await? else {
            return Ok(None);
        };
        let mut active: pass::ActiveModel = model.clone().into();
        change(&mut active, &model);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(Some(Pass::from(model)))
    }

    async fn modify_guest<F>(
        &self,
        id: Uuid,
        include_deleted: bool,
        change: F,
    ) -> AppResult<Option<GuestRequest>>
    where
        F: FnOnce(&mut guest_request::ActiveModel, &guest_request::Model) + Send,
    {
        let Some(model) = self.guest_row(id, include_deleted).await? else {
            return Ok(None);
        };
        let mut active: guest_request::ActiveModel = model.clone().into();
        change(&mut active, &model);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(Some(GuestRequest::from(model)))
    }
}

fn users_to_domain(models: Vec<user::Model>) -> AppResult<Vec<User>> {
    models
        .into_iter()
        .map(|m| User::try_from(m).map_err(Into::into))
        .collect()
}

fn window<E: EntityTrait>(query: Select<E>, page: Page) -> Select<E> {
    query.limit(page.limit).offset(page.offset)
}

#[async_trait]
impl Store for SeaStore {
    // =========================================================================
    // Users
    // =========================================================================

    async fn create_user(&self, new: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            role: Set(new.role.to_string()),
            full_name: Set(new.full_name),
            plot_number: Set(new.plot_number),
            blocked_at: Set(None),
            created_by: Set(new.created_by),
            updated_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::try_from(model)?)
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(result.map(User::try_from).transpose()?)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.user_row(id, false).await?.map(User::try_from).transpose()?)
    }

    async fn find_user_with_deleted(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.user_row(id, true).await?.map(User::try_from).transpose()?)
    }

    async fn list_users(&self, filter: ListFilter) -> AppResult<Vec<User>> {
        let mut query = user::Entity::find().order_by_desc(user::Column::CreatedAt);
        if !filter.include_deleted {
            query = query.filter(user::Column::DeletedAt.is_null());
        }
        users_to_domain(window(query, filter.page).all(&self.db).await?)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<Option<User>> {
        self.modify_user(id, false, move |active, _| {
            active.email = Set(update.email);
            active.role = Set(update.role.to_string());
            active.full_name = Set(update.full_name);
            active.plot_number = Set(update.plot_number);
            if let Some(hash) = update.password_hash {
                active.password_hash = Set(hash);
            }
            active.updated_by = Set(update.updated_by);
        })
        .await
    }

    async fn update_user_password(
        &self,
        id: Uuid,
        password_hash: String,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<User>> {
        self.modify_user(id, false, move |active, _| {
            active.password_hash = Set(password_hash);
            active.updated_by = Set(updated_by);
        })
        .await
    }

    async fn soft_delete_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        self.modify_user(id, true, move |active, current| {
            active.deleted_at = Set(current.deleted_at.or(Some(Utc::now())));
            active.updated_by = Set(updated_by);
        })
        .await
    }

    async fn restore_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        self.modify_user(id, true, move |active, _| {
            active.deleted_at = Set(None);
            active.updated_by = Set(updated_by);
        })
        .await
    }

    async fn block_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        self.modify_user(id, false, move |active, current| {
            active.blocked_at = Set(current.blocked_at.or(Some(Utc::now())));
            active.updated_by = Set(updated_by);
        })
        .await
    }

    async fn unblock_user(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<User>> {
        self.modify_user(id, false, move |active, _| {
            active.blocked_at = Set(None);
            active.updated_by = Set(updated_by);
        })
        .await
    }

    // =========================================================================
    // Passes
    // =========================================================================

    async fn create_pass(&self, new: NewPass) -> AppResult<Pass> {
        let now = Utc::now();
        let active_model = pass::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_user_id: Set(new.owner_user_id),
            plate_number: Set(new.plate_number),
            vehicle_brand: Set(new.vehicle_brand),
            vehicle_color: Set(new.vehicle_color),
            status: Set(new.status),
            created_by: Set(new.created_by),
            updated_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        Ok(Pass::from(active_model.insert(&self.db).await?))
    }

    async fn find_pass(&self, id: Uuid) -> AppResult<Option<Pass>> {
        Ok(self.pass_row(id, false).await?.map(Pass::from))
    }

    async fn find_pass_with_deleted(&self, id: Uuid) -> AppResult<Option<Pass>> {
        Ok(self.pass_row(id, true).await?.map(Pass::from))
    }

    async fn list_passes(&self, filter: ListFilter) -> AppResult<Vec<Pass>> {
        let mut query = pass::Entity::find().order_by_desc(pass::Column::CreatedAt);
        if !filter.include_deleted {
            query = query.filter(pass::Column::DeletedAt.is_null());
        }
        let models = window(query, filter.page).all(&self.db).await?;
        Ok(models.into_iter().map(Pass::from).collect())
    }

    async fn list_passes_by_owner(&self, owner_user_id: Uuid, filter: ListFilter) -> AppResult<Vec<Pass>> {
        let mut query = pass::Entity::find()
            .filter(pass::Column::OwnerUserId.eq(owner_user_id))
            .order_by_desc(pass::Column::CreatedAt);
        if !filter.include_deleted {
            query = query.filter(pass::Column::DeletedAt.is_null());
        }
        let models = window(query, filter.page).all(&self.db).await?;
        Ok(models.into_iter().map(Pass::from).collect())
    }

    async fn search_passes_by_plate(&self, plate: &str, page: Page) -> AppResult<Vec<Pass>> {
        let query = pass::Entity::find()
            .filter(pass::Column::PlateNumber.contains(plate))
            .filter(pass::Column::DeletedAt.is_null())
            .order_by_desc(pass::Column::CreatedAt);
        let models = window(query, page).all(&self.db).await?;
        Ok(models.into_iter().map(Pass::from).collect())
    }

    async fn update_pass(&self, id: Uuid, update: PassUpdate) -> AppResult<Option<Pass>> {
        self.modify_pass(id, false, move |active, _| {
            active.plate_number = Set(update.plate_number);
            active.vehicle_brand = Set(update.vehicle_brand);
            active.vehicle_color = Set(update.vehicle_color);
            active.status = Set(update.status);
            active.updated_by = Set(update.updated_by);
        })
        .await
    }

    async fn soft_delete_pass(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<Pass>> {
        self.modify_pass(id, true, move |active, current| {
            active.deleted_at = Set(current.deleted_at.or(Some(Utc::now())));
            active.updated_by = Set(updated_by);
        })
        .await
    }

    async fn restore_pass(&self, id: Uuid, updated_by: Option<Uuid>) -> AppResult<Option<Pass>> {
        self.modify_pass(id, true, move |active, _| {
            active.deleted_at = Set(None);
            active.updated_by = Set(updated_by);
        })
        .await
    }

    // =========================================================================
    // Guest requests
    // =========================================================================

    async fn create_guest_request(&self, new: NewGuestRequest) -> AppResult<GuestRequest> {
        let now = Utc::now();
        let active_model = guest_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            resident_user_id: Set(new.resident_user_id),
            guest_full_name: Set(new.guest_full_name),
            plate_number: Set(new.plate_number),
            valid_from: Set(new.valid_from),
            valid_to: Set(new.valid_to),
            status: Set(new.status),
            created_by: Set(new.created_by),
            updated_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        Ok(GuestRequest::from(active_model.insert(&self.db).await?))
    }

    async fn find_guest_request(&self, id: Uuid) -> AppResult<Option<GuestRequest>> {
        Ok(self.guest_row(id, false).await?.map(GuestRequest::from))
    }

    async fn find_guest_request_with_deleted(&self, id: Uuid) -> AppResult<Option<GuestRequest>> {
        Ok(self.guest_row(id, true).await?.map(GuestRequest::from))
    }

    async fn list_guest_requests(&self, filter: ListFilter) -> AppResult<Vec<GuestRequest>> {
        let mut query = guest_request::Entity::find().order_by_desc(guest_request::Column::CreatedAt);
        if !filter.include_deleted {
            query = query.filter(guest_request::Column::DeletedAt.is_null());
        }
        let models = window(query, filter.page).all(&self.db).await?;
        Ok(models.into_iter().map(GuestRequest::from).collect())
    }

    async fn list_guest_requests_by_resident(
        &self,
        resident_user_id: Uuid,
        filter: ListFilter,
    ) -> AppResult<Vec<GuestRequest>> {
        let mut query = guest_request::Entity::find()
            .filter(guest_request::Column::ResidentUserId.eq(resident_user_id))
            .order_by_desc(guest_request::Column::CreatedAt);
        if !filter.include_deleted {
            query = query.filter(guest_request::Column::DeletedAt.is_null());
        }
        let models = window(query, filter.page).all(&self.db).await?;
        Ok(models.into_iter().map(GuestRequest::from).collect())
    }

    async fn update_guest_request(
        &self,
        id: Uuid,
        update: GuestRequestUpdate,
    ) -> AppResult<Option<GuestRequest>> {
        self.modify_guest(id, false, move |active, _| {
            active.guest_full_name = Set(update.guest_full_name);
            active.plate_number = Set(update.plate_number);
            active.valid_from = Set(update.valid_from);
            active.valid_to = Set(update.valid_to);
            active.status = Set(update.status);
            active.updated_by = Set(update.updated_by);
        })
        .await
    }

    async fn soft_delete_guest_request(
        &self,
        id: Uuid,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<GuestRequest>> {
        self.modify_guest(id, true, move |active, current| {
            active.deleted_at = Set(current.deleted_at.or(Some(Utc::now())));
            active.updated_by = Set(updated_by);
        })
        .await
    }

    async fn restore_guest_request(
        &self,
        id: Uuid,
        updated_by: Option<Uuid>,
    ) -> AppResult<Option<GuestRequest>> {
        self.modify_guest(id, true, move |active, _| {
            active.deleted_at = Set(None);
            active.updated_by = Set(updated_by);
        })
        .await
    }

    // =========================================================================
    // Entry logs
    // =========================================================================

    async fn create_entry_log(&self, new: NewEntryLog) -> AppResult<EntryLog> {
        let active_model = entry_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            pass_id: Set(new.pass_id),
            guard_user_id: Set(new.guard_user_id),
            action: Set(new.action.to_string()),
            comment: Set(new.comment),
            action_at: Set(Utc::now()),
        };

        Ok(EntryLog::try_from(active_model.insert(&self.db).await?)?)
    }

    async fn list_entry_logs_by_pass(&self, pass_id: Uuid, page: Page) -> AppResult<Vec<EntryLog>> {
        let query = entry_log::Entity::find()
            .filter(entry_log::Column::PassId.eq(pass_id))
            .order_by_desc(entry_log::Column::ActionAt);
        window(query, page)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| EntryLog::try_from(m).map_err(Into::into))
            .collect()
    }
}
