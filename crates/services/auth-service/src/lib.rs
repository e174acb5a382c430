//! Auth Service Library
//!
//! Issues and verifies the HMAC-signed access/refresh token pairs used by the
//! gate service. Stateless: there is no revocation list.

pub mod token;

pub use token::{Claims, TokenKind, TokenManager, TokenPair};
