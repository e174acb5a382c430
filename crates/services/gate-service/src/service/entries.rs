//! Gate entry/exit logging.

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::validation::normalize_optional;
use domain::{CallerContext, EntryAction, EntryLog, Operation, Page};

use super::manager::{authorize, precheck, Access, GateManager};
use crate::repository::NewEntryLog;

#[async_trait]
pub trait EntryService: Send + Sync {
    /// Record an entry or exit against an active pass, attributed to the caller.
    async fn record_entry(
        &self,
        caller: &CallerContext,
        pass_id: Uuid,
        action: EntryAction,
        comment: Option<String>,
    ) -> AppResult<EntryLog>;

    /// Entry log of one pass, newest first. Residents only see their own passes.
    async fn list_entry_logs(
        &self,
        caller: &CallerContext,
        pass_id: Uuid,
        page: Page,
    ) -> AppResult<Vec<EntryLog>>;
}

#[async_trait]
impl EntryService for GateManager {
    async fn record_entry(
        &self,
        caller: &CallerContext,
        pass_id: Uuid,
        action: EntryAction,
        comment: Option<String>,
    ) -> AppResult<EntryLog> {
        authorize(caller, Operation::LogEntry, None)?;

        let pass = self.store.find_pass(pass_id).await?.ok_or_not_found()?;
        let entry = self
            .store
            .create_entry_log(NewEntryLog {
                pass_id: pass.id,
                guard_user_id: caller.id,
                action,
                comment: normalize_optional(comment),
            })
            .await?;

        tracing::info!(
            pass_id = %pass.id,
            plate = %pass.plate_number,
            action = %action,
            actor = %caller.id,
            "gate event recorded"
        );
        self.metrics.record_entry_log(action.as_str());
        Ok(entry)
    }

    async fn list_entry_logs(
        &self,
        caller: &CallerContext,
        pass_id: Uuid,
        page: Page,
    ) -> AppResult<Vec<EntryLog>> {
        if precheck(caller, Operation::ViewEntryLogs)? == Access::NeedsOwner {
            let pass = self
                .store
                .find_pass_with_deleted(pass_id)
                .await?
                .ok_or_not_found()?;
            authorize(caller, Operation::ViewEntryLogs, Some(pass.owner_user_id))?;
        }
        self.store.list_entry_logs_by_pass(pass_id, page).await
    }
}
