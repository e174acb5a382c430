//! Guest visit request use cases.

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::validation::{require_non_empty, validate_date_range, validate_plate};
use domain::{
    CallerContext, CreateGuestRequest, GuestRequest, Operation, Page, UpdateGuestRequest,
    DEFAULT_GUEST_STATUS,
};

use super::manager::{authorize, list_filter, permitted_status, precheck, Access, GateManager};
use crate::repository::{GuestRequestUpdate, NewGuestRequest};

#[async_trait]
pub trait GuestService: Send + Sync {
    /// Create a request. The resident defaults to the caller; the status is
    /// forced to `pending` unless the caller may set statuses.
    async fn create_guest_request(
        &self,
        caller: &CallerContext,
        input: CreateGuestRequest,
    ) -> AppResult<GuestRequest>;

    async fn get_guest_request(&self, caller: &CallerContext, id: Uuid) -> AppResult<GuestRequest>;

    async fn get_guest_request_with_deleted(
        &self,
        caller: &CallerContext,
        id: Uuid,
    ) -> AppResult<GuestRequest>;

    async fn list_guest_requests(
        &self,
        caller: &CallerContext,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<GuestRequest>>;

    async fn list_guest_requests_by_resident(
        &self,
        caller: &CallerContext,
        resident_user_id: Uuid,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<GuestRequest>>;

    /// Patch an active request; the merged visit window is re-validated.
    async fn update_guest_request(
        &self,
        caller: &CallerContext,
        id: Uuid,
        patch: UpdateGuestRequest,
    ) -> AppResult<GuestRequest>;

    async fn delete_guest_request(&self, caller: &CallerContext, id: Uuid) -> AppResult<GuestRequest>;

    async fn restore_guest_request(&self, caller: &CallerContext, id: Uuid) -> AppResult<GuestRequest>;
}

impl GateManager {
    async fn load_guest_request(&self, id: Uuid, include_deleted: bool) -> AppResult<GuestRequest> {
        let request = if include_deleted {
            self.store.find_guest_request_with_deleted(id).await?
        } else {
            self.store.find_guest_request(id).await?
        };
        request.ok_or_not_found()
    }

    /// Read a single request, checking ownership for residents.
    async fn access_guest_request(
        &self,
        caller: &CallerContext,
        id: Uuid,
        include_deleted: bool,
    ) -> AppResult<GuestRequest> {
        let access = precheck(caller, Operation::AccessGuestRequest)?;
        let request = self.load_guest_request(id, include_deleted).await?;
        if access == Access::NeedsOwner {
            authorize(caller, Operation::AccessGuestRequest, Some(request.resident_user_id))?;
        }
        Ok(request)
    }
}

#[async_trait]
impl GuestService for GateManager {
    async fn create_guest_request(
        &self,
        caller: &CallerContext,
        input: CreateGuestRequest,
    ) -> AppResult<GuestRequest> {
        let guest_full_name = require_non_empty("guest_full_name", &input.guest_full_name)?;
        let plate_number = validate_plate(&input.plate_number)?;
        validate_date_range(input.valid_from, input.valid_to)?;
        let resident_user_id = input.resident_user_id.unwrap_or(caller.id);

        authorize(caller, Operation::CreateGuestRequest, Some(resident_user_id))?;

        let status = permitted_status(
            caller,
            Operation::SetGuestStatus,
            input.status,
            DEFAULT_GUEST_STATUS.to_string(),
        );
        let request = self
            .store
            .create_guest_request(NewGuestRequest {
                resident_user_id,
                guest_full_name,
                plate_number,
                valid_from: input.valid_from,
                valid_to: input.valid_to,
                status,
                created_by: caller.audit_id(),
            })
            .await?;

        tracing::info!(
            guest_request_id = %request.id,
            resident_id = %resident_user_id,
            actor = %caller.id,
            "guest request created"
        );
        self.metrics.record_guest_request("create");
        Ok(request)
    }

    async fn get_guest_request(&self, caller: &CallerContext, id: Uuid) -> AppResult<GuestRequest> {
        self.access_guest_request(caller, id, false).await
    }

    async fn get_guest_request_with_deleted(
        &self,
        caller: &CallerContext,
        id: Uuid,
    ) -> AppResult<GuestRequest> {
        self.access_guest_request(caller, id, true).await
    }

    async fn list_guest_requests(
        &self,
        caller: &CallerContext,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<GuestRequest>> {
        authorize(caller, Operation::ListGuestRequests, None)?;
        self.store
            .list_guest_requests(list_filter(caller, include_deleted, page))
            .await
    }

    async fn list_guest_requests_by_resident(
        &self,
        caller: &CallerContext,
        resident_user_id: Uuid,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<GuestRequest>> {
        authorize(caller, Operation::ListOwnedGuestRequests, Some(resident_user_id))?;
        self.store
            .list_guest_requests_by_resident(resident_user_id, list_filter(caller, include_deleted, page))
            .await
    }

    async fn update_guest_request(
        &self,
        caller: &CallerContext,
        id: Uuid,
        patch: UpdateGuestRequest,
    ) -> AppResult<GuestRequest> {
        let guest_full_name = patch
            .guest_full_name
            .as_deref()
            .map(|n| require_non_empty("guest_full_name", n))
            .transpose()?;
        let plate_number = patch.plate_number.as_deref().map(validate_plate).transpose()?;
        if let (Some(from), Some(to)) = (patch.valid_from, patch.valid_to) {
            validate_date_range(from, to)?;
        }

        let current = self.access_guest_request(caller, id, false).await?;

        let valid_from = patch.valid_from.unwrap_or(current.valid_from);
        let valid_to = patch.valid_to.unwrap_or(current.valid_to);
        validate_date_range(valid_from, valid_to)?;

        let update = GuestRequestUpdate {
            guest_full_name: guest_full_name.unwrap_or(current.guest_full_name),
            plate_number: plate_number.unwrap_or(current.plate_number),
            valid_from,
            valid_to,
            status: permitted_status(caller, Operation::SetGuestStatus, patch.status, current.status),
            updated_by: caller.audit_id(),
        };
        let request = self
            .store
            .update_guest_request(id, update)
            .await?
            .ok_or_not_found()?;

        tracing::info!(guest_request_id = %id, actor = %caller.id, "guest request updated");
        self.metrics.record_guest_request("update");
        Ok(request)
    }

    async fn delete_guest_request(&self, caller: &CallerContext, id: Uuid) -> AppResult<GuestRequest> {
        if precheck(caller, Operation::AccessGuestRequest)? == Access::NeedsOwner {
            let request = self.load_guest_request(id, false).await?;
            authorize(caller, Operation::AccessGuestRequest, Some(request.resident_user_id))?;
        }
        let request = self
            .store
            .soft_delete_guest_request(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(guest_request_id = %id, actor = %caller.id, "guest request deleted");
        self.metrics.record_guest_request("delete");
        Ok(request)
    }

    async fn restore_guest_request(&self, caller: &CallerContext, id: Uuid) -> AppResult<GuestRequest> {
        if precheck(caller, Operation::AccessGuestRequest)? == Access::NeedsOwner {
            let request = self.load_guest_request(id, true).await?;
            authorize(caller, Operation::AccessGuestRequest, Some(request.resident_user_id))?;
        }
        let request = self
            .store
            .restore_guest_request(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(guest_request_id = %id, actor = %caller.id, "guest request restored");
        self.metrics.record_guest_request("restore");
        Ok(request)
    }
}
