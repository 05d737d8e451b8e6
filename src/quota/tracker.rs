use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::{ConsumeOutcome, QuotaRecord, QuotaUsage, ReserveDecision};
use crate::quota::window::DayWindow;

/// What to do when the counter store is unreachable. Chosen per call site:
/// low-stakes checks (IP throttling) fail open, high-stakes ones (coupons,
/// question caps) fail closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorPolicy {
    Allow,
    Deny,
}

pub struct QuotaTracker;

impl QuotaTracker {
    /// Reads the current window's consumption for a subject.
    ///
    /// A missing row, or a row whose stored window start falls outside the
    /// given window, reads as zero. No write happens on read; a stale row is
    /// rotated in place by the next increment.
    pub async fn get_usage(
        pool: &PgPool,
        subject_key: &str,
        window: &DayWindow,
    ) -> AppResult<QuotaUsage> {
        let record = sqlx::query_as::<_, QuotaRecord>(
            r#"
            SELECT subject_key, window_start, count, last_updated
            FROM quota_counters
            WHERE subject_key = $1
            "#,
        )
        .bind(subject_key)
        .fetch_optional(pool)
        .await?;

        Ok(match record {
            Some(r) if window.contains(r.window_start) => QuotaUsage {
                count: r.count,
                window_start: r.window_start,
            },
            _ => QuotaUsage {
                count: 0,
                window_start: window.start,
            },
        })
    }

    /// Like `get_usage`, but applies the fail-open/fail-closed policy when the
    /// store is unreachable.
    pub async fn usage_with_policy(
        pool: &PgPool,
        subject_key: &str,
        window: &DayWindow,
        on_store_error: StoreErrorPolicy,
    ) -> AppResult<QuotaUsage> {
        match Self::get_usage(pool, subject_key, window).await {
            Ok(usage) => Ok(usage),
            Err(AppError::Database(e)) if on_store_error == StoreErrorPolicy::Allow => {
                log::warn!(
                    "Quota store unreachable for {}, failing open: {}",
                    subject_key,
                    e
                );
                Ok(QuotaUsage {
                    count: 0,
                    window_start: window.start,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Pure admission decision over a usage snapshot. Advisory only: admission
    /// paths must use `try_consume`, which fuses the check with the write.
    pub fn check(
        current_count: i64,
        requested: i64,
        cap: i64,
        per_request_ceiling: Option<i64>,
    ) -> ReserveDecision {
        let remaining = (cap - current_count).max(0);
        let within_ceiling = per_request_ceiling.map_or(true, |c| requested <= c);
        ReserveDecision {
            allowed: cap > 0 && requested <= remaining && within_ceiling,
            remaining,
            current_count,
        }
    }

    /// Records consumption unconditionally and returns the new count.
    ///
    /// A single upsert: a fresh subject or a stale window overwrites the row
    /// with `count = amount`, an in-window row is incremented. Being one
    /// statement, concurrent increments for the same subject never lose
    /// updates.
    ///
    /// Windows only rotate forward. A call with a window older than the
    /// stored row never rewinds the counter; it leaves the row as is and
    /// returns the stored count.
    pub async fn increment(
        pool: &PgPool,
        subject_key: &str,
        amount: i64,
        window: &DayWindow,
    ) -> AppResult<i64> {
        if amount < 1 {
            return Err(AppError::Validation(
                "Increment amount must be at least 1".to_string(),
            ));
        }

        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO quota_counters (subject_key, window_start, count, last_updated)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (subject_key) DO UPDATE SET
                count = CASE
                    WHEN quota_counters.window_start >= $2 AND quota_counters.window_start < $4
                    THEN quota_counters.count + EXCLUDED.count
                    WHEN quota_counters.window_start < $2
                    THEN EXCLUDED.count
                    ELSE quota_counters.count
                END,
                window_start = CASE
                    WHEN quota_counters.window_start < $2 THEN $2
                    ELSE quota_counters.window_start
                END,
                last_updated = now()
            RETURNING count
            "#,
        )
        .bind(subject_key)
        .bind(window.start)
        .bind(amount)
        .bind(window.end)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Fused check-and-increment: admits `amount` only if the resulting count
    /// stays within `cap`, in one indivisible statement.
    ///
    /// The conditional upsert rejects (updates nothing, returns no row) when an
    /// in-window count would exceed the cap; a stale or missing row counts as
    /// zero and rotates. Two callers racing for the last unit can therefore
    /// never both be admitted. A request against a window the stored row has
    /// already superseded is rejected without touching the counter.
    pub async fn try_consume(
        pool: &PgPool,
        subject_key: &str,
        amount: i64,
        cap: i64,
        window: &DayWindow,
        on_store_error: StoreErrorPolicy,
    ) -> AppResult<ConsumeOutcome> {
        if amount < 1 {
            return Err(AppError::Validation(
                "Consume amount must be at least 1".to_string(),
            ));
        }

        // The statement's cap condition only guards the update path; a fresh
        // row's resulting count is just `amount`, so bound it here. Covers
        // cap = 0, which always denies.
        if amount > cap {
            let usage = Self::usage_with_policy(pool, subject_key, window, on_store_error).await?;
            return Ok(ConsumeOutcome {
                allowed: false,
                count: usage.count,
                remaining: (cap - usage.count).max(0),
            });
        }

        let result: Result<Option<i64>, sqlx::Error> = sqlx::query_scalar(
            r#"
            INSERT INTO quota_counters (subject_key, window_start, count, last_updated)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (subject_key) DO UPDATE SET
                count = CASE
                    WHEN quota_counters.window_start >= $2
                    THEN quota_counters.count + EXCLUDED.count
                    ELSE EXCLUDED.count
                END,
                window_start = CASE
                    WHEN quota_counters.window_start < $2 THEN $2
                    ELSE quota_counters.window_start
                END,
                last_updated = now()
            WHERE quota_counters.window_start < $4
              AND (CASE
                    WHEN quota_counters.window_start >= $2
                    THEN quota_counters.count
                    ELSE 0
                END) + EXCLUDED.count <= $5
            RETURNING count
            "#,
        )
        .bind(subject_key)
        .bind(window.start)
        .bind(amount)
        .bind(window.end)
        .bind(cap)
        .fetch_optional(pool)
        .await;

        match result {
            Ok(Some(count)) => Ok(ConsumeOutcome {
                allowed: true,
                count,
                remaining: (cap - count).max(0),
            }),
            // Cap condition rejected the write; report the snapshot
            Ok(None) => {
                let usage = Self::get_usage(pool, subject_key, window).await?;
                Ok(ConsumeOutcome {
                    allowed: false,
                    count: usage.count,
                    remaining: (cap - usage.count).max(0),
                })
            }
            Err(e) if on_store_error == StoreErrorPolicy::Allow => {
                log::warn!(
                    "Quota store unreachable for {}, failing open: {}",
                    subject_key,
                    e
                );
                Ok(ConsumeOutcome {
                    allowed: true,
                    count: 0,
                    remaining: cap,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
