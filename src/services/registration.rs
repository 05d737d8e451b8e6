use sqlx::PgPool;

use crate::config::QuotaConfig;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::quota::{DayWindow, QuotaTracker, StoreErrorPolicy};

/// Result of a registration attempt
pub enum RegistrationOutcome {
    Created(User),
    /// Per-IP cap hit; seconds until the window rolls over
    Throttled { retry_after: u64 },
}

pub struct RegistrationService;

impl RegistrationService {
    /// Subject key for the per-IP registration throttle
    pub fn subject_key(ip: &str) -> String {
        format!("register_{}", ip)
    }

    /// Registers a new user, throttled per client IP per reference day.
    ///
    /// The throttle fails open: registration is a low-stakes check and an
    /// unreachable counter store must not lock everyone out. The user insert
    /// itself still fails closed like any other write.
    pub async fn register(
        pool: &PgPool,
        email: &str,
        ip: &str,
        quota: &QuotaConfig,
    ) -> AppResult<RegistrationOutcome> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(
                "A valid email address is required".to_string(),
            ));
        }

        let window = DayWindow::containing(chrono::Utc::now(), quota.day_offset_hours);
        let outcome = QuotaTracker::try_consume(
            pool,
            &Self::subject_key(ip),
            1,
            quota.registration_ip_daily_cap,
            &window,
            StoreErrorPolicy::Allow,
        )
        .await?;

        if !outcome.allowed {
            log::warn!("Registration throttled for IP {}", ip);
            return Ok(RegistrationOutcome::Throttled {
                retry_after: window.retry_after_secs(chrono::Utc::now()),
            });
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, created_at
            "#,
        )
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::Conflict("Email is already registered".to_string()))?;

        log::info!("User {} registered", user.id);
        Ok(RegistrationOutcome::Created(user))
    }
}
