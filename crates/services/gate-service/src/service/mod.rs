//! Service layer - validation, authorization and orchestration of the store.

mod auth;
mod entries;
mod guests;
mod manager;
mod passes;
#[cfg(test)]
mod test_support;
mod users;

pub use auth::{AuthService, LoginResponse};
pub use entries::EntryService;
pub use guests::GuestService;
pub use manager::GateManager;
pub use passes::PassService;
pub use users::UserService;
