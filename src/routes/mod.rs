pub mod auth;
pub mod coupons;
pub mod health;
pub mod notices;
pub mod questions;
