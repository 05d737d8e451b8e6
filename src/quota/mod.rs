pub mod tracker;
pub mod window;

pub use tracker::{QuotaTracker, StoreErrorPolicy};
pub use window::DayWindow;
