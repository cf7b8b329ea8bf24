#![no_std]

//! Shared utility library for the custody bank contracts
//!
//! This library provides common functions, helpers, and patterns used across
//! the custody workspace including:
//! - Math utilities (safe math, scaled division, decimal rescaling)
//! - Time utilities (ledger timestamps, staleness windows)
//! - Validation utilities
//! - Storage helpers
//! - Access control patterns
//! - Event emission patterns

pub mod access_control;
pub mod events;
pub mod math;
pub mod storage;
pub mod time;
pub mod validation;


// Re-export commonly used items
pub use access_control::*;
pub use events::*;
pub use math::*;
pub use storage::Storage;
pub use time::*;
pub use validation::*;
