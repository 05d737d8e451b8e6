pub mod coupon;
pub mod notice;
pub mod quota;
pub mod user;

pub use coupon::{Coupon, CreateCoupon, RedeemCoupon, RedemptionOutcome};
pub use notice::{CreateNotice, Notice, UpdateNotice};
pub use quota::{ConsumeOutcome, QuotaRecord, QuotaUsage, ReserveDecision};
pub use user::{RegisterRequest, User};
