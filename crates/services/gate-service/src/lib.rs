//! Gate Service Library
//!
//! Access control for a gated community: accounts, vehicle passes, guest
//! visit requests and the gate entry log, behind role-based authorization.
//! Transport adapters embed [`GateManager`] and call its service traits.

pub mod config;
pub mod infra;
pub mod metrics;
pub mod repository;
pub mod service;

use std::sync::Arc;

use auth_service_lib::TokenManager;
use tracing::info;

use crate::config::GateServiceConfig;
use crate::infra::Database;
use crate::metrics::{new_registry, GateMetrics};
use crate::repository::{SeaStore, Store};

pub use crate::service::{
    AuthService, EntryService, GateManager, GuestService, LoginResponse, PassService, UserService,
};

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Wire a manager around any store.
pub fn build_manager(
    store: Arc<dyn Store>,
    config: &GateServiceConfig,
) -> Result<GateManager, Box<dyn std::error::Error>> {
    let tokens = Arc::new(TokenManager::new(&config.tokens)?);
    let metrics = GateMetrics::new(new_registry())?;
    Ok(GateManager::new(store, tokens, metrics))
}

/// Connect to the database and build a manager backed by it.
pub async fn connect(config: &GateServiceConfig) -> Result<GateManager, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    if config.migrate_on_start {
        db.run_migrations().await?;
        info!("Migrations applied");
    }
    let store: Arc<dyn Store> = Arc::new(SeaStore::new(db.get_connection()));
    build_manager(store, config)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = GateServiceConfig::from_env()?;
    let db = Database::connect(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Create the first administrator if the user table is empty.
pub async fn run_bootstrap() -> Result<(), Box<dyn std::error::Error>> {
    let config = GateServiceConfig::from_env()?;
    let Some(bootstrap) = config.bootstrap.clone() else {
        return Err("BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set".into());
    };

    let manager = connect(&config).await?;
    match manager.ensure_bootstrap_admin(&bootstrap).await? {
        Some(admin) => info!(user_id = %admin.id, "Bootstrap admin created"),
        None => info!("Users already exist, nothing to bootstrap"),
    }

    Ok(())
}
