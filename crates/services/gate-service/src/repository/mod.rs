//! Repository layer for data access.

pub mod entities;
mod memory;
mod sea_store;
mod store;

pub use memory::MemoryStore;
pub use sea_store::SeaStore;
pub use store::{
    GuestRequestUpdate, ListFilter, NewEntryLog, NewGuestRequest, NewPass, NewUser, PassUpdate,
    Store, UserUpdate,
};

#[cfg(test)]
pub use store::MockStore;
