//! Shared helpers for the integration suite


pub use db::TestDb;
