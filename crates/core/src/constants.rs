//! Shared constants for eventboard.

/// Events dated more than this many days in the past are marked expired on import.
pub const EXPIRY_DAYS: i64 = 30;

/// Default page size for `GET /events`.
pub const DEFAULT_EVENT_LIMIT: usize = 100;

/// Upper bound for `GET /events` page size.
pub const MAX_EVENT_LIMIT: usize = 500;

/// Maximum number of events accepted by a single batch request.
pub const MAX_BATCH_EVENTS: usize = 500;

/// Cap on events rendered into the monthly preview email.
pub const PREVIEW_EVENT_LIMIT: usize = 500;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// JWT claim holding the caller's roles.
pub const ROLES_CLAIM: &str = "https://eventboard/roles";

/// Subject line for the monthly subscriber newsletter.
pub const NEWSLETTER_SUBJECT: &str = "Your Monthly Wargame Events";
