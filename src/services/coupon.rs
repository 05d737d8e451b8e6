use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Coupon, CreateCoupon, RedemptionOutcome};
use crate::quota::QuotaTracker;

pub struct CouponService;

impl CouponService {
    /// Creates a coupon. Codes are stored uppercase and matched exactly.
    pub async fn create(pool: &PgPool, input: CreateCoupon) -> AppResult<Coupon> {
        let code = input.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(AppError::Validation("Code cannot be empty".to_string()));
        }
        if !(1..=100).contains(&input.discount_percent) {
            return Err(AppError::Validation(
                "Discount must be between 1 and 100 percent".to_string(),
            ));
        }
        if input.max_uses < 0 || input.max_uses_per_user < 0 {
            return Err(AppError::Validation(
                "Usage caps cannot be negative".to_string(),
            ));
        }

        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            INSERT INTO coupons (code, discount_percent, max_uses, max_uses_per_user)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            RETURNING id, code, discount_percent, max_uses, max_uses_per_user, created_at
            "#,
        )
        .bind(&code)
        .bind(input.discount_percent)
        .bind(input.max_uses)
        .bind(input.max_uses_per_user)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Coupon {} already exists", code)))?;

        Ok(coupon)
    }

    /// Gets a coupon by code
    pub async fn get_by_code(pool: &PgPool, code: &str) -> AppResult<Coupon> {
        let code = code.trim().to_uppercase();
        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            SELECT id, code, discount_percent, max_uses, max_uses_per_user, created_at
            FROM coupons
            WHERE code = $1
            "#,
        )
        .bind(&code)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Coupon {} not found", code)))?;

        Ok(coupon)
    }

    /// Redeems a coupon for a user, enforcing both the all-time global cap and
    /// the per-user cap. Both checks must pass independently.
    ///
    /// The coupon row is locked for the duration of count + insert, which
    /// serializes concurrent redemptions of the same coupon; without the lock
    /// two callers could both observe one remaining use. Store errors
    /// propagate (fail closed): a coupon is never over-redeemed because the
    /// counter could not be read.
    pub async fn redeem(pool: &PgPool, code: &str, user_id: Uuid) -> AppResult<RedemptionOutcome> {
        let code = code.trim().to_uppercase();
        let mut tx = pool.begin().await?;

        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            SELECT id, code, discount_percent, max_uses, max_uses_per_user, created_at
            FROM coupons
            WHERE code = $1
            FOR UPDATE
            "#,
        )
        .bind(&code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Coupon {} not found", code)))?;

        let global_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM coupon_redemptions WHERE coupon_id = $1")
                .bind(coupon.id)
                .fetch_one(&mut *tx)
                .await?;

        let user_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM coupon_redemptions WHERE coupon_id = $1 AND user_id = $2",
        )
        .bind(coupon.id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let global = QuotaTracker::check(global_count, 1, coupon.max_uses, None);
        let per_user = QuotaTracker::check(user_count, 1, coupon.max_uses_per_user, None);

        if !global.allowed || !per_user.allowed {
            // Cap exhaustion is a result, not an error; nothing was written
            tx.rollback().await?;
            return Ok(RedemptionOutcome {
                allowed: false,
                discount_percent: coupon.discount_percent,
                remaining_uses: global.remaining,
                remaining_user_uses: per_user.remaining,
            });
        }

        sqlx::query("INSERT INTO coupon_redemptions (coupon_id, user_id) VALUES ($1, $2)")
            .bind(coupon.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("Coupon {} redeemed by user {}", coupon.code, user_id);
        Ok(RedemptionOutcome {
            allowed: true,
            discount_percent: coupon.discount_percent,
            remaining_uses: global.remaining - 1,
            remaining_user_uses: per_user.remaining - 1,
        })
    }
}
