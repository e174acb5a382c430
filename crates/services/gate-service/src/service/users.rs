//! Account management use cases. Admin only.

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, BootstrapConfig, OptionExt};
use domain::validation::{require_non_empty, validate_plot, validate_role};
use domain::{CallerContext, CreateUser, Operation, Page, Password, UpdateUser, User, ROLE_ADMIN};

use super::manager::{authorize, list_filter, merge_optional, GateManager};
use crate::repository::{NewUser, UserUpdate};

/// User service trait for dependency injection.
///
/// By default, operations exclude soft-deleted users.
/// Use `*_with_deleted` variants to include them.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account; residents must carry a plot number.
    async fn create_user(&self, caller: &CallerContext, input: CreateUser) -> AppResult<User>;

    /// Get active user by ID (excludes soft-deleted)
    async fn get_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User>;

    /// Get user by ID including soft-deleted
    async fn get_user_with_deleted(&self, caller: &CallerContext, id: Uuid) -> AppResult<User>;

    /// List users, newest first
    async fn list_users(
        &self,
        caller: &CallerContext,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<User>>;

    /// Patch an active user. The merged record is validated and a present
    /// password hashed before the single store write.
    async fn update_user(&self, caller: &CallerContext, id: Uuid, patch: UpdateUser) -> AppResult<User>;

    /// Rotate the password of an active user
    async fn change_password(&self, caller: &CallerContext, id: Uuid, password: &str) -> AppResult<User>;

    /// Soft delete user (sets deleted_at timestamp)
    async fn delete_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User>;

    /// Restore a soft-deleted user
    async fn restore_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User>;

    async fn block_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User>;

    async fn unblock_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User>;

    /// Create the first administrator when no user exists yet.
    ///
    /// Returns `None` when the user table already has rows.
    async fn ensure_bootstrap_admin(&self, config: &BootstrapConfig) -> AppResult<Option<User>>;
}

fn required_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::invalid("password is required"));
    }
    Ok(())
}

#[async_trait]
impl UserService for GateManager {
    async fn create_user(&self, caller: &CallerContext, input: CreateUser) -> AppResult<User> {
        let email = require_non_empty("email", &input.email)?;
        required_password(&input.password)?;
        let role = validate_role(input.role.trim())?;
        let full_name = require_non_empty("full_name", &input.full_name)?;
        let plot_number = validate_plot(role, input.plot_number)?;

        authorize(caller, Operation::ManageUsers, None)?;

        let password = Password::new(&input.password)?;
        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash: password.into_string(),
                role,
                full_name,
                plot_number,
                created_by: caller.audit_id(),
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, actor = %caller.id, "user created");
        self.metrics.record_user("create");
        Ok(user)
    }

    async fn get_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User> {
        authorize(caller, Operation::ManageUsers, None)?;
        self.store.find_user(id).await?.ok_or_not_found()
    }

    async fn get_user_with_deleted(&self, caller: &CallerContext, id: Uuid) -> AppResult<User> {
        authorize(caller, Operation::ManageUsers, None)?;
        self.store.find_user_with_deleted(id).await?.ok_or_not_found()
    }

    async fn list_users(
        &self,
        caller: &CallerContext,
        include_deleted: bool,
        page: Page,
    ) -> AppResult<Vec<User>> {
        authorize(caller, Operation::ManageUsers, None)?;
        self.store
            .list_users(list_filter(caller, include_deleted, page))
            .await
    }

    async fn update_user(&self, caller: &CallerContext, id: Uuid, patch: UpdateUser) -> AppResult<User> {
        let email = patch
            .email
            .as_deref()
            .map(|e| require_non_empty("email", e))
            .transpose()?;
        let role = patch
            .role
            .as_deref()
            .map(|r| validate_role(r.trim()))
            .transpose()?;
        let full_name = patch
            .full_name
            .as_deref()
            .map(|n| require_non_empty("full_name", n))
            .transpose()?;
        if let Some(password) = patch.password.as_deref() {
            required_password(password)?;
        }

        authorize(caller, Operation::ManageUsers, None)?;

        let current = self.store.find_user(id).await?.ok_or_not_found()?;

        let role = role.unwrap_or(current.role);
        let plot_number = merge_optional(patch.plot_number, current.plot_number);
        let password_hash = patch
            .password
            .as_deref()
            .map(Password::new)
            .transpose()?
            .map(Password::into_string);
        let rotated = password_hash.is_some();
        let update = UserUpdate {
            email: email.unwrap_or(current.email),
            role,
            full_name: full_name.unwrap_or(current.full_name),
            plot_number: validate_plot(role, plot_number)?,
            password_hash,
            updated_by: caller.audit_id(),
        };

        let user = self.store.update_user(id, update).await?.ok_or_not_found()?;
        if rotated {
            self.metrics.record_user("password");
        }

        tracing::info!(user_id = %id, actor = %caller.id, "user updated");
        self.metrics.record_user("update");
        Ok(user)
    }

    async fn change_password(&self, caller: &CallerContext, id: Uuid, password: &str) -> AppResult<User> {
        required_password(password)?;
        authorize(caller, Operation::ManageUsers, None)?;

        let password = Password::new(password)?;
        let user = self
            .store
            .update_user_password(id, password.into_string(), caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(user_id = %id, actor = %caller.id, "password changed");
        self.metrics.record_user("password");
        Ok(user)
    }

    async fn delete_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User> {
        authorize(caller, Operation::ManageUsers, None)?;
        let user = self
            .store
            .soft_delete_user(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(user_id = %id, actor = %caller.id, "user deleted");
        self.metrics.record_user("delete");
        Ok(user)
    }

    async fn restore_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User> {
        authorize(caller, Operation::ManageUsers, None)?;
        let user = self
            .store
            .restore_user(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(user_id = %id, actor = %caller.id, "user restored");
        self.metrics.record_user("restore");
        Ok(user)
    }

    async fn block_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User> {
        authorize(caller, Operation::ManageUsers, None)?;
        let user = self
            .store
            .block_user(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(user_id = %id, actor = %caller.id, "user blocked");
        self.metrics.record_user("block");
        Ok(user)
    }

    async fn unblock_user(&self, caller: &CallerContext, id: Uuid) -> AppResult<User> {
        authorize(caller, Operation::ManageUsers, None)?;
        let user = self
            .store
            .unblock_user(id, caller.audit_id())
            .await?
            .ok_or_not_found()?;

        tracing::info!(user_id = %id, actor = %caller.id, "user unblocked");
        self.metrics.record_user("unblock");
        Ok(user)
    }

    async fn ensure_bootstrap_admin(&self, config: &BootstrapConfig) -> AppResult<Option<User>> {
        if self.store.count_users().await? > 0 {
            tracing::debug!("users exist, skipping bootstrap admin");
            return Ok(None);
        }

        let input = CreateUser {
            email: config.email.clone(),
            password: config.password.clone(),
            role: ROLE_ADMIN.to_string(),
            full_name: config.full_name.clone(),
            plot_number: None,
        };
        let admin = self.create_user(&CallerContext::system(), input).await?;
        tracing::info!(user_id = %admin.id, email = %admin.email, "bootstrap admin created");
        Ok(Some(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockStore;
    use crate::service::test_support::{caller, gate, user};
    use domain::{verify_password, Role};
    use mockall::predicate::eq;

    fn resident_input() -> CreateUser {
        CreateUser {
            email: " new@example.com ".to_string(),
            password: "pw-123".to_string(),
            role: "resident".to_string(),
            full_name: " New Resident ".to_string(),
            plot_number: Some(" 7B ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_user_normalizes_and_hashes() {
        let admin = caller(Role::Admin);
        let admin_id = admin.id;

        let mut store = MockStore::new();
        store
            .expect_create_user()
            .withf(move |new: &NewUser| {
                new.email == "new@example.com"
                    && new.full_name == "New Resident"
                    && new.plot_number.as_deref() == Some("7B")
                    && new.role == Role::Resident
                    && new.created_by == Some(admin_id)
                    && verify_password("pw-123", &new.password_hash).unwrap()
            })
            .times(1)
            .returning(|new| {
                let mut created = user(new.role);
                created.email = new.email;
                Ok(created)
            });

        let service = gate(store);
        let created = service.create_user(&admin, resident_input()).await.unwrap();
        assert_eq!(created.email, "new@example.com");
        assert_eq!(service.metrics().user_events("create"), 1);
    }

    #[tokio::test]
    async fn test_create_resident_without_plot_skips_store() {
        let mut input = resident_input();
        input.plot_number = Some("   ".to_string());

        let result = gate(MockStore::new()).create_user(&caller(Role::Admin), input).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_input() {
        let service = gate(MockStore::new());
        let admin = caller(Role::Admin);

        let mut bad_role = resident_input();
        bad_role.role = "superuser".to_string();
        let mut no_email = resident_input();
        no_email.email = " ".to_string();
        let mut no_password = resident_input();
        no_password.password = String::new();
        let mut no_name = resident_input();
        no_name.full_name = String::new();

        for input in [bad_role, no_email, no_password, no_name] {
            let result = service.create_user(&admin, input).await;
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn test_non_admin_cannot_manage_users() {
        let service = gate(MockStore::new());
        let id = Uuid::new_v4();

        for role in [Role::Guard, Role::Resident] {
            let who = caller(role);
            assert!(matches!(
                service.create_user(&who, resident_input()).await,
                Err(AppError::Forbidden)
            ));
            assert!(matches!(service.get_user(&who, id).await, Err(AppError::Forbidden)));
            assert!(matches!(service.block_user(&who, id).await, Err(AppError::Forbidden)));
            assert!(matches!(service.delete_user(&who, id).await, Err(AppError::Forbidden)));
            assert!(matches!(
                service.list_users(&who, false, Page::default()).await,
                Err(AppError::Forbidden)
            ));
        }
    }

    #[tokio::test]
    async fn test_update_user_merges_patch() {
        let admin = caller(Role::Admin);
        let current = user(Role::Resident);
        let id = current.id;
        let found = current.clone();

        let mut store = MockStore::new();
        store
            .expect_find_user()
            .with(eq(id))
            .returning(move |_| Ok(Some(found.clone())));
        store
            .expect_update_user()
            .withf(move |uid, update: &UserUpdate| {
                *uid == id
                    && update.full_name == "Renamed"
                    && update.email == "resident@example.com"
                    && update.plot_number.as_deref() == Some("12A")
                    && update.role == Role::Resident
                    && update.password_hash.is_none()
            })
            .times(1)
            .returning(move |_, update| {
                let mut updated = current.clone();
                updated.full_name = update.full_name;
                Ok(Some(updated))
            });

        let patch = UpdateUser {
            full_name: Some(" Renamed ".to_string()),
            ..UpdateUser::default()
        };
        let updated = gate(store).update_user(&admin, id, patch).await.unwrap();
        assert_eq!(updated.full_name, "Renamed");
    }

    #[tokio::test]
    async fn test_update_user_rejects_resident_without_plot() {
        let current = user(Role::Guard);
        let id = current.id;

        let mut store = MockStore::new();
        store
            .expect_find_user()
            .returning(move |_| Ok(Some(current.clone())));
        store.expect_update_user().never();

        let patch = UpdateUser {
            role: Some("resident".to_string()),
            ..UpdateUser::default()
        };
        let result = gate(store).update_user(&caller(Role::Admin), id, patch).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_user_rotates_password() {
        let current = user(Role::Admin);
        let id = current.id;
        let found = current.clone();
        let updated = current.clone();

        let mut store = MockStore::new();
        store
            .expect_find_user()
            .returning(move |_| Ok(Some(found.clone())));
        store
            .expect_update_user()
            .withf(move |uid, update: &UserUpdate| {
                *uid == id
                    && update
                        .password_hash
                        .as_deref()
                        .is_some_and(|hash| verify_password("rotated", hash).unwrap())
            })
            .times(1)
            .returning(move |_, update| {
                let mut rotated = updated.clone();
                rotated.full_name = update.full_name;
                rotated.password_hash = update.password_hash.unwrap_or_default();
                Ok(Some(rotated))
            });
        store.expect_update_user_password().never();

        let patch = UpdateUser {
            full_name: Some("Renamed".to_string()),
            password: Some("rotated".to_string()),
            ..UpdateUser::default()
        };
        let service = gate(store);
        let user = service.update_user(&caller(Role::Admin), id, patch).await.unwrap();
        assert_eq!(user.full_name, "Renamed");
        assert!(verify_password("rotated", &user.password_hash).unwrap());
        assert_eq!(service.metrics().user_events("password"), 1);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut store = MockStore::new();
        store.expect_find_user().returning(|_| Ok(None));

        let result = gate(store)
            .update_user(&caller(Role::Admin), Uuid::new_v4(), UpdateUser::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_lifecycle_writes_carry_audit_id() {
        let admin = caller(Role::Admin);
        let target = user(Role::Resident);
        let id = target.id;

        let mut store = MockStore::new();
        let blocked = target.clone();
        store
            .expect_block_user()
            .with(eq(id), eq(Some(admin.id)))
            .times(1)
            .returning(move |_, _| Ok(Some(blocked.clone())));
        store
            .expect_soft_delete_user()
            .with(eq(id), eq(Some(admin.id)))
            .times(1)
            .returning(move |_, _| Ok(Some(target.clone())));

        let service = gate(store);
        service.block_user(&admin, id).await.unwrap();
        service.delete_user(&admin, id).await.unwrap();
        assert_eq!(service.metrics().user_events("block"), 1);
        assert_eq!(service.metrics().user_events("delete"), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut store = MockStore::new();
        store.expect_restore_user().returning(|_, _| Ok(None));
        store.expect_unblock_user().returning(|_, _| Ok(None));

        let service = gate(store);
        let admin = caller(Role::Admin);
        assert!(matches!(
            service.restore_user(&admin, Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            service.unblock_user(&admin, Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_change_password_rejects_empty() {
        let result = gate(MockStore::new())
            .change_password(&caller(Role::Admin), Uuid::new_v4(), "")
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_only_when_empty() {
        let config = BootstrapConfig {
            email: "root@example.com".to_string(),
            password: "bootstrap-pw".to_string(),
            full_name: "Administrator".to_string(),
        };

        let mut populated = MockStore::new();
        populated.expect_count_users().returning(|| Ok(3));
        populated.expect_create_user().never();
        assert!(gate(populated).ensure_bootstrap_admin(&config).await.unwrap().is_none());

        let mut empty = MockStore::new();
        empty.expect_count_users().returning(|| Ok(0));
        empty
            .expect_create_user()
            .withf(|new: &NewUser| {
                new.role == Role::Admin && new.created_by.is_none() && new.plot_number.is_none()
            })
            .times(1)
            .returning(|new| {
                let mut created = user(Role::Admin);
                created.email = new.email;
                Ok(created)
            });

        let admin = gate(empty).ensure_bootstrap_admin(&config).await.unwrap().unwrap();
        assert_eq!(admin.email, "root@example.com");
    }
}
