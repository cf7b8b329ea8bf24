//! Access control patterns and utilities

use super::storage::Storage;
use soroban_sdk::{Address, Env, Symbol};

/// Access control helper functions
pub struct AccessControl;

impl AccessControl {
    /// Require that the caller is the admin
    ///
    /// # Arguments
    /// * `e` - The environment
    /// * `caller` - The caller address
    ///
    /// # Panics
    /// Panics with "Unauthorized: only admin" if caller is not admin
    pub fn require_admin(e: &Env, caller: &Address) {
        caller.require_auth();
        let admin = Storage::get_admin(e);
        if *caller != admin {
            panic!("Unauthorized: only admin can perform this action");
        }
    }

    /// Check if an address is the admin
    pub fn is_admin(e: &Env, address: &Address) -> bool {
        let admin = Storage::get_admin(e);
        *address == admin
    }

    /// Check membership in a flagged set stored under a composite
    /// `(set_key, address)` instance key. Used for feeder whitelists and
    /// capability grants.
    pub fn is_member(e: &Env, set_key: &Symbol, address: &Address) -> bool {
        let key = (set_key.clone(), address.clone());
        e.storage().instance().get::<_, bool>(&key).unwrap_or(false)
    }

    /// Add or remove an address in a flagged set. Callers are expected to
    /// have checked authorization already.
    pub fn set_member(e: &Env, set_key: &Symbol, address: &Address, member: bool) {
        let key = (set_key.clone(), address.clone());
        if member {
            e.storage().instance().set(&key, &true);
        } else {
            e.storage().instance().remove(&key);
        }
    }

    /// Require that the caller is admin or a member of the given set
    ///
    /// # Panics
    /// Panics with "Unauthorized" if caller is neither admin nor member
    pub fn require_admin_or_member(e: &Env, caller: &Address, set_key: &Symbol) {
        caller.require_auth();

        if Self::is_admin(e, caller) {
            return;
        }
        if !Self::is_member(e, set_key, caller) {
            panic!("Unauthorized: caller is not admin or authorized");
        }
    }
}
