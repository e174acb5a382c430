//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Administrator role with full access
pub const ROLE_ADMIN: &str = "admin";

/// Gate guard role (searches passes, records entries and exits)
pub const ROLE_GUARD: &str = "guard";

/// Resident role (owns passes and guest requests)
pub const ROLE_RESIDENT: &str = "resident";

// =============================================================================
// Lifecycle defaults
// =============================================================================

/// Status assigned to a new pass when the caller may not choose one
pub const DEFAULT_PASS_STATUS: &str = "active";

/// Status assigned to a new guest request when the caller may not choose one
pub const DEFAULT_GUEST_STATUS: &str = "pending";

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Maximum allowed items per page
pub const MAX_PAGE_LIMIT: u64 = 100;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;

/// Default refresh token lifetime in hours (7 days)
pub const DEFAULT_REFRESH_TTL_HOURS: i64 = 7 * 24;

/// Longest accepted access token lifetime (1 day)
pub const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime (1 year)
pub const MAX_REFRESH_TTL_HOURS: i64 = 365 * 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per minute (for token expiration calculation)
pub const SECONDS_PER_MINUTE: i64 = 60;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
