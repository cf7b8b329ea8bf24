//! Validation utilities for common input validation patterns

/// Validation utility functions
pub struct Validation;

impl Validation {
    /// Validate that an amount is greater than zero
    ///
    /// # Panics
    /// Panics with "Invalid amount" if amount <= 0
    pub fn require_positive(amount: i128) {
        if amount <= 0 {
            panic!("Invalid amount: must be greater than zero");
        }
    }

    /// Validate that an amount is greater than or equal to zero
    ///
    /// # Panics
    /// Panics with "Invalid amount" if amount < 0
    pub fn require_non_negative(amount: i128) {
        if amount < 0 {
            panic!("Invalid amount: must be non-negative");
        }
    }

    /// Validate a fixed-decimal count. Feeds report at most 18 decimals.
    ///
    /// # Panics
    /// Panics with "Invalid decimals" if decimals > 18
    pub fn require_valid_decimals(decimals: u32) {
        if decimals > 18 {
            panic!("Invalid decimals: must be at most 18");
        }
    }

    /// Validate a basis-point figure (0-10000)
    ///
    /// # Panics
    /// Panics with "Invalid bps" if bps > 10000
    pub fn require_valid_bps(bps: u32) {
        if bps > 10_000 {
            panic!("Invalid bps: must be between 0 and 10000");
        }
    }
}
