#![no_std]

//! Misbehaving token for exercising the custody bank's defensive paths.
//!
//! Implements the `balance`/`transfer` subset of the token interface the
//! bank actually calls, with three fault knobs: `set_fee_bps` burns a cut of
//! every transfer in flight (fee-on-transfer), `set_halted` makes every
//! transfer trap, and `set_reenter` makes the next outbound transfer from
//! the configured target attempt a nested call back into it. Minting is
//! open; this token exists only inside tests.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, vec,
    Address, Env, IntoVal, Val, Vec,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenError {
    InsufficientBalance = 1,
    Halted = 2,
}

/// A pending re-entry attempt: when `target` next transfers out of this
/// token, call `withdraw(account, asset, amount)` back on it and record
/// whether the nested call succeeded.
#[contracttype]
#[derive(Clone)]
pub struct ReenterPlan {
    pub target: Address,
    pub account: Address,
    pub asset: Option<Address>,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Balance(Address),
    FeeBps,
    Halted,
    Reenter,
    ReenterOutcome,
}

const BPS_DENOM: i128 = 10_000;

#[contract]
pub struct MockTokenContract;

#[contractimpl]
impl MockTokenContract {
    pub fn mint(e: Env, to: Address, amount: i128) {
        let balance = Self::balance(e.clone(), to.clone());
        e.storage()
            .persistent()
            .set(&DataKey::Balance(to), &(balance + amount));
    }

    pub fn balance(e: Env, id: Address) -> i128 {
        e.storage()
            .persistent()
            .get::<_, i128>(&DataKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn transfer(e: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        if e.storage()
            .instance()
            .get::<_, bool>(&DataKey::Halted)
            .unwrap_or(false)
        {
            panic_with_error!(&e, TokenError::Halted);
        }

        let from_balance = Self::balance(e.clone(), from.clone());
        if amount > from_balance {
            panic_with_error!(&e, TokenError::InsufficientBalance);
        }

        // the fee cut is burned in flight
        let fee_bps = e
            .storage()
            .instance()
            .get::<_, u32>(&DataKey::FeeBps)
            .unwrap_or(0);
        let received = amount - amount * fee_bps as i128 / BPS_DENOM;

        let to_balance = Self::balance(e.clone(), to.clone());
        e.storage()
            .persistent()
            .set(&DataKey::Balance(from.clone()), &(from_balance - amount));
        e.storage()
            .persistent()
            .set(&DataKey::Balance(to.clone()), &(to_balance + received));
        e.events()
            .publish((symbol_short!("transfer"), from.clone(), to), amount);

        Self::maybe_reenter(&e, &from);
    }

    /// Fee burned on every transfer, in basis points.
    pub fn set_fee_bps(e: Env, bps: u32) {
        e.storage().instance().set(&DataKey::FeeBps, &bps);
    }

    /// Make every subsequent transfer trap.
    pub fn set_halted(e: Env, halted: bool) {
        e.storage().instance().set(&DataKey::Halted, &halted);
    }

    /// Arm a one-shot re-entry attempt against `target` (see [`ReenterPlan`]).
    pub fn set_reenter(e: Env, plan: ReenterPlan) {
        e.storage().instance().set(&DataKey::Reenter, &plan);
    }

    /// Outcome of the last fired re-entry attempt, if any. `true` means the
    /// nested call went through.
    pub fn reenter_outcome(e: Env) -> Option<bool> {
        e.storage()
            .instance()
            .get::<_, bool>(&DataKey::ReenterOutcome)
    }

    fn maybe_reenter(e: &Env, from: &Address) {
        let plan = match e.storage().instance().get::<_, ReenterPlan>(&DataKey::Reenter) {
            Some(plan) if plan.target == *from => plan,
            _ => return,
        };
        // one-shot: disarm before invoking so the nested path cannot loop
        e.storage().instance().remove(&DataKey::Reenter);

        let args: Vec<Val> = vec![
            e,
            plan.account.into_val(e),
            plan.asset.into_val(e),
            plan.amount.into_val(e),
        ];
        let result = e.try_invoke_contract::<Val, soroban_sdk::Error>(
            &plan.target,
            &symbol_short!("withdraw"),
            args,
        );
        let succeeded = matches!(result, Ok(Ok(_)));
        e.storage()
            .instance()
            .set(&DataKey::ReenterOutcome, &succeeded);
    }
}
