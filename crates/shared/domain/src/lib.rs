//! Domain layer - Core business entities and rules.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! entities, the closed role set, input validation, credential hashing and
//! the authorization policy.

pub mod constants;
pub mod entry;
pub mod error;
pub mod guest;
pub mod pagination;
pub mod pass;
pub mod password;
pub mod policy;
pub mod role;
pub mod user;
pub mod validation;

pub use constants::*;
pub use entry::{EntryAction, EntryLog};
pub use error::{DomainError, DomainResult};
pub use guest::{CreateGuestRequest, GuestRequest, UpdateGuestRequest};
pub use pagination::Page;
pub use pass::{CreatePass, Pass, PassDetail, UpdatePass};
pub use password::{hash_password, verify_password, Password, DUMMY_HASH};
pub use policy::{allowed, requires_owner, Operation};
pub use role::{CallerContext, Role};
pub use user::{CreateUser, UpdateUser, User, UserResponse};
