//! Time utilities for ledger timestamps and staleness windows

use soroban_sdk::Env;

/// Time utility functions for working with ledger timestamps
pub struct TimeUtils;

impl TimeUtils {
    /// Get the current ledger timestamp
    pub fn now(e: &Env) -> u64 {
        e.ledger().timestamp()
    }

    /// Convert hours to seconds
    ///
    /// # Arguments
    /// * `hours` - Number of hours
    ///
    /// # Returns
    /// Number of seconds
    pub fn hours_to_seconds(hours: u32) -> u64 {
        hours as u64 * 60 * 60
    }

    /// Seconds elapsed since an earlier timestamp. Timestamps in the
    /// future of the current ledger count as zero elapsed time.
    ///
    /// # Arguments
    /// * `e` - The environment
    /// * `earlier` - The earlier timestamp
    ///
    /// # Returns
    /// Elapsed seconds
    pub fn elapsed_since(e: &Env, earlier: u64) -> u64 {
        Self::now(e).saturating_sub(earlier)
    }

    /// Check whether a timestamp is older than a maximum age.
    ///
    /// # Arguments
    /// * `e` - The environment
    /// * `timestamp` - The timestamp to check
    /// * `max_age_seconds` - Maximum acceptable age
    ///
    /// # Returns
    /// `true` if the timestamp is strictly older than `max_age_seconds`
    pub fn is_older_than(e: &Env, timestamp: u64, max_age_seconds: u64) -> bool {
        Self::elapsed_since(e, timestamp) > max_age_seconds
    }
}
