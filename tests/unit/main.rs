//! Unit tests
//!
//! Tests for individual components in isolation: window arithmetic, the pure
//! admission decision, and configuration parsing.
