use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A per-subject consumption counter for the current window.
///
/// At most one row exists per subject key. A row whose `window_start` lies
/// outside the window being asked about reads as zero consumption; it is
/// overwritten in place on the next increment (no reset write on read).
#[derive(Debug, Clone, FromRow)]
pub struct QuotaRecord {
    pub subject_key: String,
    pub window_start: DateTime<Utc>,
    pub count: i64,
    #[allow(dead_code)] // Useful for debugging quota issues
    pub last_updated: DateTime<Utc>,
}

/// Usage snapshot returned to callers (no store types leak through)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuotaUsage {
    pub count: i64,
    pub window_start: DateTime<Utc>,
}

/// Pure admission decision over a usage snapshot
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReserveDecision {
    pub allowed: bool,
    pub remaining: i64,
    pub current_count: i64,
}

/// Result of a fused check-and-increment
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsumeOutcome {
    pub allowed: bool,
    /// Counter value after the call (unchanged when rejected)
    pub count: i64,
    pub remaining: i64,
}
