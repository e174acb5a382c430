//! SeaORM entities, one module per table.

pub mod entry_log;
pub mod guest_request;
pub mod pass;
pub mod user;
