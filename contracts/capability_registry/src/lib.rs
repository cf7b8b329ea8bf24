#![no_std]

//! Capability registry for the custody workspace.
//!
//! Holds role grants consulted by other contracts before caps, price feeds,
//! or balances may be administratively altered. Roles are short symbols
//! (e.g. `bank_adm`); a grant is a boolean flag per (account, role) pair.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Symbol,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    /// Grant flag per (account, role)
    Grant(Address, Symbol),
}

fn read_admin(e: &Env) -> Result<Address, RegistryError> {
    e.storage()
        .instance()
        .get::<_, Address>(&DataKey::Admin)
        .ok_or(RegistryError::NotInitialized)
}

fn require_admin(e: &Env, caller: &Address) -> Result<(), RegistryError> {
    caller.require_auth();
    let admin = read_admin(e)?;
    if *caller != admin {
        return Err(RegistryError::Unauthorized);
    }
    Ok(())
}

#[contract]
pub struct CapabilityRegistryContract;

#[contractimpl]
impl CapabilityRegistryContract {
    /// Initialize the registry with an admin. Call once. The admin holds
    /// every capability implicitly.
    pub fn initialize(e: Env, admin: Address) -> Result<(), RegistryError> {
        if e.storage().instance().has(&DataKey::Admin) {
            return Err(RegistryError::AlreadyInitialized);
        }
        e.storage().instance().set(&DataKey::Admin, &admin);
        Ok(())
    }

    /// Grant a role to an account. Admin only.
    pub fn grant(e: Env, caller: Address, account: Address, role: Symbol) -> Result<(), RegistryError> {
        require_admin(&e, &caller)?;
        e.storage()
            .instance()
            .set(&DataKey::Grant(account.clone(), role.clone()), &true);
        e.events().publish(
            (symbol_short!("Granted"), account, role),
            e.ledger().timestamp(),
        );
        Ok(())
    }

    /// Revoke a role from an account. Admin only.
    pub fn revoke(e: Env, caller: Address, account: Address, role: Symbol) -> Result<(), RegistryError> {
        require_admin(&e, &caller)?;
        e.storage()
            .instance()
            .remove(&DataKey::Grant(account.clone(), role.clone()));
        e.events().publish(
            (symbol_short!("Revoked"), account, role),
            e.ledger().timestamp(),
        );
        Ok(())
    }

    /// Check whether an account holds a role. The admin always does.
    pub fn has_capability(e: Env, account: Address, role: Symbol) -> bool {
        if let Some(admin) = e.storage().instance().get::<_, Address>(&DataKey::Admin) {
            if account == admin {
                return true;
            }
        }
        e.storage()
            .instance()
            .get::<_, bool>(&DataKey::Grant(account, role))
            .unwrap_or(false)
    }

    /// Get admin address.
    pub fn get_admin(e: Env) -> Result<Address, RegistryError> {
        read_admin(&e)
    }
}
