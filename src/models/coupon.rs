use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Discount coupon with an all-time global cap and a per-user cap.
/// A cap of 0 means the coupon can never be redeemed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i64,
    pub max_uses_per_user: i64,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a coupon
#[derive(Debug, Deserialize)]
pub struct CreateCoupon {
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i64,
    pub max_uses_per_user: i64,
}

/// DTO for redeeming a coupon
#[derive(Debug, Deserialize)]
pub struct RedeemCoupon {
    pub code: String,
}

/// Result of a redemption attempt. Cap exhaustion is a result, never an error.
#[derive(Debug, Serialize)]
pub struct RedemptionOutcome {
    pub allowed: bool,
    pub discount_percent: i32,
    /// Global uses left after this attempt
    pub remaining_uses: i64,
    /// Uses left for this user after this attempt
    pub remaining_user_uses: i64,
}
