//! Storage helper utilities for common storage patterns

use soroban_sdk::{Address, Env, Symbol};

/// Storage key constants
pub mod keys {
    use soroban_sdk::{symbol_short, Symbol};

    pub const ADMIN: Symbol = symbol_short!("ADMIN");
    pub const INITIALIZED: Symbol = symbol_short!("INIT");
}

/// Storage helper functions
pub struct Storage;

impl Storage {
    /// Check if a contract has been initialized
    pub fn is_initialized(e: &Env) -> bool {
        e.storage().instance().has(&keys::INITIALIZED)
    }

    /// Require that the contract is initialized, panic otherwise
    ///
    /// # Panics
    /// Panics with "Contract not initialized" if not initialized
    pub fn require_initialized(e: &Env) {
        if !Self::is_initialized(e) {
            panic!("Contract not initialized");
        }
    }

    /// Mark contract as initialized
    pub fn set_initialized(e: &Env) {
        e.storage().instance().set(&keys::INITIALIZED, &true);
    }

    /// Check if contract is already initialized and panic if so
    ///
    /// # Panics
    /// Panics with "Contract already initialized" if already initialized
    pub fn require_not_initialized(e: &Env) {
        if Self::is_initialized(e) {
            panic!("Contract already initialized");
        }
    }

    /// Get admin address from storage
    ///
    /// # Panics
    /// Panics if contract not initialized or admin not set
    pub fn get_admin(e: &Env) -> Address {
        Self::require_initialized(e);
        e.storage()
            .instance()
            .get::<_, Address>(&keys::ADMIN)
            .unwrap_or_else(|| panic!("Admin not set"))
    }

    /// Set admin address in storage
    pub fn set_admin(e: &Env, admin: &Address) {
        e.storage().instance().set(&keys::ADMIN, admin);
    }

    /// Generic instance storage getter with default value
    pub fn get_or_default<T>(e: &Env, key: &Symbol, default: T) -> T
    where
        T: Clone + soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
    {
        e.storage().instance().get::<_, T>(key).unwrap_or(default)
    }

    /// Generic instance storage setter
    pub fn set<T>(e: &Env, key: &Symbol, value: &T)
    where
        T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        e.storage().instance().set(key, value);
    }
}
