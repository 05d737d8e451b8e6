pub mod coupon;
pub mod notice;
pub mod registration;

pub use coupon::CouponService;
pub use notice::NoticeService;
pub use registration::{RegistrationOutcome, RegistrationService};
