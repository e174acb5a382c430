//! Vehicle pass use cases.

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::validation::{normalize_optional, validate_plate};
use domain::{
    CallerContext, CreatePass, Operation, Page, Pass, PassDetail, UpdatePass, UserResponse,
    DEFAULT_PASS_STATUS,
};

use super::manager::{
    authorize, list_filter, merge_optional, permitted_status, precheck, Access, GateManager,
};
use crate::repository::{NewPass, PassUpdate};

#[async_trait]
pub trait PassService: Send + Sync {
    /// Create a pass. The owner defaults to the caller; the status is forced
    /// to `active` unless the caller may set statuses.
    async fn create_pass(&self, caller: &CallerContext, input: CreatePass) -> AppResult<Pass>;

    /// Active pass with its owner's profile
    async fn get_pass(&self, caller: &CallerContext, id: Uuid) -> AppResult<PassDetail>;

    async fn get_pass_with_deleted(&self, caller: &CallerContext, id: Uuid) -> AppResult<PassDetail>;

    /// Every pass. Guards only ever see active ones.
    async fn list_passes(
        &self,
        caller: &CallerContext,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<Pass>>;

    async fn list_passes_by_owner(
        &self,
        caller: &CallerContext,
        owner_user_id: Uuid,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<Pass>>;

    /// Active passes matching a plate. The plate must be valid and is
    /// normalized before the lookup.
    async fn search_passes(&self, caller: &CallerContext, plate: &str, page: Page) -> AppResult<Vec<Pass>>;

    /// Patch an active pass; a status change needs permission to set statuses.
    async fn update_pass(&self, caller: &CallerContext, id: Uuid, patch: UpdatePass) -> AppResult<Pass>;

    async fn delete_pass(&self, caller: &CallerContext, id: Uuid) -> AppResult<Pass>;

    async fn restore_pass(&self, caller: &CallerContext, id: Uuid) -> AppResult<Pass>;
}

impl GateManager {
    /// Attach the owner's profile, soft-deleted owners included. A failed
    /// owner lookup leaves it empty.
    async fn pass_detail(&self, pass: Pass) -> PassDetail {
        let owner = match self.store.find_user_with_deleted(pass.owner_user_id).await {
            Ok(owner) => owner.map(UserResponse::from),
            Err(e) => {
                tracing::debug!(pass_id = %pass.id, error = %e, "pass owner lookup failed");
                None
            }
        };
        PassDetail { pass, owner }
    }

    /// Authorize single-pass access, reading the owner only when needed.
    async fn authorize_pass(&self, caller: &CallerContext, id: Uuid, include_deleted: bool) -> AppResult<()> {
        if precheck(caller, Operation::AccessPass)? == Access::NeedsOwner {
            let pass = if include_deleted {
                self.store.find_pass_with_deleted(id).await?
            } else {
                self.store.find_pass(id).await?
            }
            .ok_or_not_found()?;
            authorize(caller, Operation::AccessPass, Some(pass.owner_user_id))?;
        }
        Ok(())
    }
}

#[async_trait]
impl PassService for GateManager {
    async fn create_pass(&self, caller: &CallerContext, input: CreatePass) -> AppResult<Pass> {
        let plate_number = validate_plate(&input.plate_number)?;
        let owner_user_id = input.owner_user_id.unwrap_or(caller.id);

        authorize(caller, Operation::CreatePass, Some(owner_user_id))?;

        let status = permitted_status(
            caller,
            Operation::SetPassStatus,
            input.status,
            DEFAULT_PASS_STATUS.to_string(),
        );
        let pass = self
            .store
            .create_pass(NewPass {
                owner_user_id,
                plate_number,
                vehicle_brand: normalize_optional(input.vehicle_brand),
                vehicle_color: normalize_optional(input.vehicle_color),
                status,
                created_by: caller.audit_id(),
            })
            .await?;

        tracing::info!(pass_id = %pass.id, owner_id = %owner_user_id, actor = %caller.id, "pass created");
        self.metrics.record_pass("create");
        Ok(pass)
    }

    async fn get_pass(&self, caller: &CallerContext, id: Uuid) -> AppResult<PassDetail> {
        let access = precheck(caller, Operation::AccessPass)?;
        let pass = self.store.find_pass(id).await?.ok_or_not_found()?;
        if access == Access::NeedsOwner {
            authorize(caller, Operation::AccessPass, Some(pass.owner_user_id))?;
        }
        Ok(self.pass_detail(pass).await)
    }

    async fn get_pass_with_deleted(&self, caller: &CallerContext, id: Uuid) -> AppResult<PassDetail> {
        let access = precheck(caller, Operation::AccessPass)?;
        let pass = self.store.find_pass_with_deleted(id).await?.ok_or_not_found()?;
        if access == Access::NeedsOwner {
            authorize(caller, Operation::AccessPass, Some(pass.owner_user_id))?;
        }
        Ok(self.pass_detail(pass).await)
    }

    async fn list_passes(
        &self,
        caller: &CallerContext,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<Pass>> {
        authorize(caller, Operation::SearchPasses, None)?;
        self.store
            .list_passes(list_filter(caller, include_deleted, page))
            .await
    }

    async fn list_passes_by_owner(
        &self,
        caller: &CallerContext,
        owner_user_id: Uuid,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<Pass>> {
        authorize(caller, Operation::ListOwnedPasses, Some(owner_user_id))?;
        self.store
            .list_passes_by_owner(owner_user_id, list_filter(caller, include_deleted, page))
            .await
    }

    async fn search_passes(&self, caller: &CallerContext, plate: &str, page: Page) -> AppResult<Vec<Pass>> {
        let plate = validate_plate(plate)?;
        authorize(caller, Operation::SearchPasses, None)?;
        self.store.search_passes_by_plate(&plate, page).await
    }

    async fn update_pass(&self, caller: &CallerContext, id: Uuid, patch: UpdatePass) -> AppResult<Pass> {
        let plate_number = patch.plate_number.as_deref().map(validate_plate).transpose()?;

        let access = precheck(caller, Operation::AccessPass)?;
        let current = self.store.find_pass(id).await?.ok_or_not_found()?;
        if access == Access::NeedsOwner {
            authorize(caller, Operation::AccessPass, Some(current.owner_user_id))?;
        }

        let update = PassUpdate {
            plate_number: plate_number.unwrap_or(current.plate_number),
            vehicle_brand: merge_optional(patch.vehicle_brand, current.vehicle_brand),
            vehicle_color: merge_optional(patch.vehicle_color, current.vehicle_color),
            status: permitted_status(caller, Operation::SetPassStatus, patch.status, current.status),
            updated_by: caller.audit_id(),
        };
        let pass = self.store.update_pass(id, update).await?.ok_or_not_found()?;

        tracing::info!(pass_id = %id, actor = %caller.id, "pass updated");
        self.metrics.record_pass("update");
        Ok(pass)
    }

    async fn delete_pass(&self, caller: &CallerContext, id: Uuid) -> AppResult<Pass> {
        self.authorize_pass(caller, id, false).await?;
        let pass = self
            .store
            .soft_delete_pass(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(pass_id = %id, actor = %caller.id, "pass deleted");
        self.metrics.record_pass("delete");
        Ok(pass)
    }

    async fn restore_pass(&self, caller: &CallerContext, id: Uuid) -> AppResult<Pass> {
        self.authorize_pass(caller, id, true).await?;
        let pass = self
            .store
            .restore_pass(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(pass_id = %id, actor = %caller.id, "pass restored");
        self.metrics.record_pass("restore");
        Ok(pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockStore;
    use crate::service::test_support::{caller, gate, pass, user};
    use common::AppError;
    use domain::Role;
    use mockall::predicate::eq;

    fn create_input(owner: Option<Uuid>) -> CreatePass {
        CreatePass {
            owner_user_id: owner,
            plate_number: " a123bc77 ".to_string(),
            vehicle_brand: Some(" Lada ".to_string()),
            vehicle_color: Some("   ".to_string()),
            status: Some("revoked".to_string()),
        }
    }

    fn echo_created(new: NewPass) -> AppResult<Pass> {
        let mut created = pass(new.owner_user_id);
        created.plate_number = new.plate_number;
        created.vehicle_brand = new.vehicle_brand;
        created.vehicle_color = new.vehicle_color;
        created.status = new.status;
        Ok(created)
    }

    #[tokio::test]
    async fn test_resident_creates_own_pass_with_forced_status() {
        let resident = caller(Role::Resident);
        let resident_id = resident.id;

        let mut store = MockStore::new();
        store
            .expect_create_pass()
            .withf(move |new: &NewPass| {
                new.owner_user_id == resident_id
                    && new.plate_number == "A123BC77"
                    && new.vehicle_brand.as_deref() == Some("Lada")
                    && new.vehicle_color.is_none()
                    && new.status == "active"
                    && new.created_by == Some(resident_id)
            })
            .times(1)
            .returning(echo_created);

        let service = gate(store);
        let created = service.create_pass(&resident, create_input(None)).await.unwrap();
        assert_eq!(created.owner_user_id, resident_id);
        assert_eq!(service.metrics().pass_events("create"), 1);
    }

    #[tokio::test]
    async fn test_admin_sets_owner_and_status() {
        let owner = Uuid::new_v4();
        let mut store = MockStore::new();
        store
            .expect_create_pass()
            .withf(move |new: &NewPass| new.owner_user_id == owner && new.status == "revoked")
            .times(1)
            .returning(echo_created);

        let created = gate(store)
            .create_pass(&caller(Role::Admin), create_input(Some(owner)))
            .await
            .unwrap();
        assert_eq!(created.status, "revoked");
    }

    #[tokio::test]
    async fn test_create_pass_denials_skip_store() {
        let service = gate(MockStore::new());

        let result = service
            .create_pass(&caller(Role::Resident), create_input(Some(Uuid::new_v4())))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));

        let result = service.create_pass(&caller(Role::Guard), create_input(None)).await;
        assert!(matches!(result, Err(AppError::Forbidden)));

        let mut bad_plate = create_input(None);
        bad_plate.plate_number = "123ABC".to_string();
        let result = service.create_pass(&caller(Role::Admin), bad_plate).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_pass_includes_owner() {
        let owner = user(Role::Resident);
        let owner_id = owner.id;
        let found = pass(owner_id);
        let pass_id = found.id;

        let mut store = MockStore::new();
        store
            .expect_find_pass()
            .with(eq(pass_id))
            .returning(move |_| Ok(Some(found.clone())));
        store
            .expect_find_user_with_deleted()
            .with(eq(owner_id))
            .returning(move |_| Ok(Some(owner.clone())));

        let resident = CallerContext::new(owner_id, Role::Resident);
        let detail = gate(store).get_pass(&resident, pass_id).await.unwrap();
        assert_eq!(detail.pass.id, pass_id);
        assert_eq!(detail.owner.map(|o| o.id), Some(owner_id));
    }

    #[tokio::test]
    async fn test_get_pass_of_another_resident_is_forbidden() {
        let found = pass(Uuid::new_v4());
        let mut store = MockStore::new();
        store
            .expect_find_pass()
            .returning(move |_| Ok(Some(found.clone())));

        let result = gate(store).get_pass(&caller(Role::Resident), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_guard_cannot_read_single_pass() {
        let result = gate(MockStore::new())
            .get_pass(&caller(Role::Guard), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_guard_lists_active_only() {
        let mut store = MockStore::new();
        store
            .expect_list_passes()
            .withf(|filter| !filter.include_deleted)
            .times(1)
            .returning(|_| Ok(vec![]));

        let passes = gate(store)
            .list_passes(&caller(Role::Guard), true, Page::default())
            .await
            .unwrap();
        assert!(passes.is_empty());
    }

    #[tokio::test]
    async fn test_search_normalizes_plate() {
        let mut store = MockStore::new();
        store
            .expect_search_passes_by_plate()
            .withf(|plate, _| plate == "A123BC77")
            .times(1)
            .returning(|_, _| Ok(vec![]));

        gate(store)
            .search_passes(&caller(Role::Guard), " a123bc77 ", Page::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_plate_and_residents() {
        let service = gate(MockStore::new());
        assert!(matches!(
            service
                .search_passes(&caller(Role::Guard), "nope", Page::default())
                .await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service
                .search_passes(&caller(Role::Resident), "A123BC77", Page::default())
                .await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_scoped_to_resident() {
        let resident = caller(Role::Resident);
        let resident_id = resident.id;

        let mut store = MockStore::new();
        store
            .expect_list_passes_by_owner()
            .withf(move |owner, filter| *owner == resident_id && !filter.include_deleted)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = gate(store);
        service
            .list_passes_by_owner(&resident, resident_id, true, Page::default())
            .await
            .unwrap();
        assert!(matches!(
            service
                .list_passes_by_owner(&resident, Uuid::new_v4(), false, Page::default())
                .await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_resident_update_keeps_status() {
        let resident = caller(Role::Resident);
        let current = pass(resident.id);
        let id = current.id;
        let found = current.clone();

        let mut store = MockStore::new();
        store
            .expect_find_pass()
            .returning(move |_| Ok(Some(found.clone())));
        store
            .expect_update_pass()
            .withf(|_, update: &PassUpdate| {
                update.status == "active"
                    && update.plate_number == "X999XX01"
                    && update.vehicle_brand.is_none()
                    && update.vehicle_color.is_none()
            })
            .times(1)
            .returning(move |_, update| {
                let mut updated = current.clone();
                updated.plate_number = update.plate_number;
                Ok(Some(updated))
            });

        let patch = UpdatePass {
            plate_number: Some("x999xx01".to_string()),
            vehicle_brand: Some(String::new()),
            status: Some("revoked".to_string()),
            ..UpdatePass::default()
        };
        let updated = gate(store).update_pass(&resident, id, patch).await.unwrap();
        assert_eq!(updated.plate_number, "X999XX01");
    }

    #[tokio::test]
    async fn test_admin_delete_skips_owner_lookup() {
        let admin = caller(Role::Admin);
        let deleted = pass(Uuid::new_v4());
        let id = deleted.id;

        let mut store = MockStore::new();
        store.expect_find_pass().never();
        store
            .expect_soft_delete_pass()
            .with(eq(id), eq(Some(admin.id)))
            .times(1)
            .returning(move |_, _| Ok(Some(deleted.clone())));

        gate(store).delete_pass(&admin, id).await.unwrap();
    }

    #[tokio::test]
    async fn test_resident_restore_uses_deleted_lookup() {
        let resident = caller(Role::Resident);
        let mut deleted = pass(resident.id);
        deleted.deleted_at = Some(chrono::Utc::now());
        let id = deleted.id;
        let restored = pass(resident.id);

        let mut store = MockStore::new();
        store
            .expect_find_pass_with_deleted()
            .with(eq(id))
            .returning(move |_| Ok(Some(deleted.clone())));
        store
            .expect_restore_pass()
            .times(1)
            .returning(move |_, _| Ok(Some(restored.clone())));

        let service = gate(store);
        service.restore_pass(&resident, id).await.unwrap();
        assert_eq!(service.metrics().pass_events("restore"), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_pass_is_not_found() {
        let mut store = MockStore::new();
        store.expect_soft_delete_pass().returning(|_, _| Ok(None));

        let result = gate(store).delete_pass(&caller(Role::Admin), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
