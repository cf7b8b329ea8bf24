//! Event emission patterns and utilities

use soroban_sdk::{symbol_short, Address, Env, Symbol, Topics};

/// Event emission helper functions
pub struct Events;

impl Events {
    /// Emit a simple event with topic and data
    pub fn emit<T>(e: &Env, topic: Symbol, data: T)
    where
        T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        e.events().publish((topic,), data);
    }

    /// Emit an event with multiple topics
    pub fn emit_with_topics<T, U>(e: &Env, topics: T, data: U)
    where
        T: Topics,
        U: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        e.events().publish(topics, data);
    }

    /// Emit a deposit settlement event. `asset` is the canonical asset
    /// the ledger was credited in; `amount` is the realized amount.
    pub fn emit_deposit<A>(e: &Env, account: &Address, asset: A, amount: i128)
    where
        A: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
        soroban_sdk::Val: soroban_sdk::TryFromVal<Env, A>,
    {
        Self::emit_with_topics(
            e,
            (symbol_short!("Deposit"), account.clone()),
            (asset, amount, e.ledger().timestamp()),
        );
    }

    /// Emit a withdrawal settlement event.
    pub fn emit_withdraw<A>(e: &Env, account: &Address, asset: A, amount: i128)
    where
        A: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
        soroban_sdk::Val: soroban_sdk::TryFromVal<Env, A>,
    {
        Self::emit_with_topics(
            e,
            (symbol_short!("Withdraw"), account.clone()),
            (asset, amount, e.ledger().timestamp()),
        );
    }

    /// Emit a conversion settlement event. `amount_in` is what entered the
    /// swap leg, `realized` the balance-delta-measured result.
    pub fn emit_converted(
        e: &Env,
        account: &Address,
        counter_asset: &Address,
        amount_in: i128,
        realized: i128,
    ) {
        Self::emit_with_topics(
            e,
            (symbol_short!("Convert"), account.clone(), counter_asset.clone()),
            (amount_in, realized, e.ledger().timestamp()),
        );
    }

    /// Emit a configuration change event.
    pub fn emit_config_set(e: &Env, caller: &Address, key: Symbol, value: i128) {
        Self::emit_with_topics(
            e,
            (symbol_short!("CfgSet"), key),
            (caller.clone(), value, e.ledger().timestamp()),
        );
    }
}
