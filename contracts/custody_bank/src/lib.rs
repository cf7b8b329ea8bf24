#![no_std]

//! Multi-asset custody bank.
//!
//! Accepts deposits of the native asset and fungible tokens, tracks
//! per-account per-asset balances with running custody totals, and releases
//! funds on withdrawal subject to three independent guards: a USD-denominated
//! withdrawal ceiling derived from an external price feed, an optional flat
//! per-transaction native-asset cap, and a global custody cap. A conversion
//! path routes incoming or outgoing value through an external exchange and
//! settles it in a single configured settlement asset.
//!
//! Realized amounts are always measured as balance deltas, never taken from
//! a collaborator's return value, so the ledger stays correct against
//! fee-on-transfer tokens, silently failing transfers, and venues that
//! misreport fills.

use shared_utils::{Events, SafeMath, TimeUtils, Validation};
use soroban_sdk::{
    contract, contractclient, contracterror, contractimpl, contracttype, symbol_short, token,
    Address, Env, Symbol,
};

// ============================================================================
// Errors
// ============================================================================

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum BankError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    ZeroAmount = 4,
    InsufficientBalance = 5,
    CustodyCapExceeded = 6,
    NativePerTxExceeded = 7,
    UsdLimitExceeded = 8,
    InvalidPrice = 9,
    StalePrice = 10,
    TransferFailed = 11,
    SwapReturnedZero = 12,
    AssetMismatch = 13,
    ReentrantCall = 14,
}

impl BankError {
    pub fn message(&self) -> &'static str {
        match self {
            BankError::NotInitialized => "Contract not initialized",
            BankError::AlreadyInitialized => "Contract already initialized",
            BankError::Unauthorized => "Unauthorized: caller lacks capability",
            BankError::ZeroAmount => "Amount must be greater than zero",
            BankError::InsufficientBalance => "Insufficient recorded balance",
            BankError::CustodyCapExceeded => "Custody cap exceeded",
            BankError::NativePerTxExceeded => "Per-transaction native cap exceeded",
            BankError::UsdLimitExceeded => "USD withdrawal ceiling exceeded",
            BankError::InvalidPrice => "Price feed answer invalid",
            BankError::StalePrice => "Price feed answer stale",
            BankError::TransferFailed => "Token transfer failed",
            BankError::SwapReturnedZero => "Swap realized no value",
            BankError::AssetMismatch => "Asset does not fit this operation",
            BankError::ReentrantCall => "Reentrant settlement call",
        }
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Fixed decimal count every price quote is normalized to.
pub const PRICE_DECIMALS: u32 = 8;
/// Decimal count of the native asset's unit.
pub const NATIVE_DECIMALS: u32 = 7;
/// One whole native unit.
pub const NATIVE_UNIT: i128 = 10_000_000;
/// One USD at the price scale.
pub const USD_UNIT: i128 = 100_000_000;
/// Default price staleness tolerance in seconds.
pub const DEFAULT_STALENESS_SECONDS: u64 = 3600;

/// Capability role consulted on the registry for every admin mutation.
pub const ROLE_BANK_ADMIN: Symbol = symbol_short!("bank_adm");

// ============================================================================
// Data types
// ============================================================================

/// Canonical asset identity. Every ledger and limit operation keys on this
/// closed variant, never on a raw reference.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Asset {
    Native,
    Token(Address),
}

impl Asset {
    /// The token contract that actually holds this asset's value.
    fn contract(&self, native_token: &Address) -> Address {
        match self {
            Asset::Native => native_token.clone(),
            Asset::Token(addr) => addr.clone(),
        }
    }
}

/// Collapse a raw asset reference to its canonical form. The zero reference
/// (`None`) and the native alias (the configured native token contract) both
/// denote the native asset. Pure and idempotent.
pub fn canonicalize(raw: &Option<Address>, native_token: &Address) -> Asset {
    match raw {
        None => Asset::Native,
        Some(addr) if addr == native_token => Asset::Native,
        Some(addr) => Asset::Token(addr.clone()),
    }
}

/// One round as reported by a price feed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub updated_at: u64,
    pub answered_in_round: u64,
}

/// Read-only view of the limit configuration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LimitConfig {
    /// USD withdrawal ceiling in whole dollars
    pub usd_ceiling: i128,
    /// Flat per-transaction native cap; zero means no flat cap configured
    pub flat_cap: i128,
    /// Global custody cap; zero means uncapped
    pub custody_cap: i128,
    /// Maximum age of a price quote in seconds
    pub staleness_tolerance: u64,
}

// ============================================================================
// External interfaces (the shape the core needs, nothing more)
// ============================================================================

/// Round-based price source.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn latest_round(env: Env) -> RoundData;
    fn decimals(env: Env) -> u32;
}

/// Swap venue. The return value is a reported figure the bank never trusts;
/// realized amounts are measured as balance deltas around the call.
#[contractclient(name = "ExchangeClient")]
pub trait Exchange {
    fn swap(
        env: Env,
        to: Address,
        sell: Address,
        buy: Address,
        amount_in: i128,
        min_out: i128,
    ) -> i128;
}

/// Capability registry consulted before any administrative mutation.
#[contractclient(name = "CapabilityClient")]
pub trait Capability {
    fn has_capability(env: Env, account: Address, role: Symbol) -> bool;
}

// ============================================================================
// Storage
// ============================================================================

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // instance
    Registry,
    NativeToken,
    SettlementToken,
    Exchange,
    Feed(Asset),
    FlatCap,
    CustodyCap,
    UsdCeiling,
    StalenessTolerance,
    ReentrancyGuard,
    // persistent
    Balance(Asset, Address),
    Total(Asset),
    DepositCount,
    WithdrawCount,
}

fn read_address(e: &Env, key: &DataKey) -> Result<Address, BankError> {
    e.storage()
        .instance()
        .get::<_, Address>(key)
        .ok_or(BankError::NotInitialized)
}

fn read_i128(e: &Env, key: &DataKey) -> i128 {
    e.storage().instance().get::<_, i128>(key).unwrap_or(0)
}

fn read_staleness(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get::<_, u64>(&DataKey::StalenessTolerance)
        .unwrap_or(DEFAULT_STALENESS_SECONDS)
}

// ============================================================================
// Ledger
// ============================================================================

fn balance_of(e: &Env, asset: &Asset, account: &Address) -> i128 {
    e.storage()
        .persistent()
        .get::<_, i128>(&DataKey::Balance(asset.clone(), account.clone()))
        .unwrap_or(0)
}

fn total_of(e: &Env, asset: &Asset) -> i128 {
    e.storage()
        .persistent()
        .get::<_, i128>(&DataKey::Total(asset.clone()))
        .unwrap_or(0)
}

fn write_balance(e: &Env, asset: &Asset, account: &Address, amount: i128) {
    e.storage()
        .persistent()
        .set(&DataKey::Balance(asset.clone(), account.clone()), &amount);
}

fn write_total(e: &Env, asset: &Asset, amount: i128) {
    e.storage()
        .persistent()
        .set(&DataKey::Total(asset.clone()), &amount);
}

/// Unconditional increase of a balance and its custody total.
fn credit(e: &Env, asset: &Asset, account: &Address, amount: i128) {
    let balance = SafeMath::add(balance_of(e, asset, account), amount);
    let total = SafeMath::add(total_of(e, asset), amount);
    write_balance(e, asset, account, balance);
    write_total(e, asset, total);
}

/// Decrease a balance and its custody total. Fails before any mutation when
/// the recorded balance is insufficient.
fn debit(e: &Env, asset: &Asset, account: &Address, amount: i128) -> Result<(), BankError> {
    let balance = balance_of(e, asset, account);
    if amount > balance {
        return Err(BankError::InsufficientBalance);
    }
    write_balance(e, asset, account, SafeMath::sub(balance, amount));
    write_total(e, asset, SafeMath::sub(total_of(e, asset), amount));
    Ok(())
}

/// Re-credit a previously debited amount, restoring exact pre-debit state.
/// Used only to undo a debit whose external leg failed.
fn reverse_debit(e: &Env, asset: &Asset, account: &Address, amount: i128) {
    credit(e, asset, account, amount);
}

fn read_counter(e: &Env, key: &DataKey) -> u64 {
    e.storage().persistent().get::<_, u64>(key).unwrap_or(0)
}

fn bump_counter(e: &Env, key: &DataKey, delta: i64) {
    let current = read_counter(e, key) as i64;
    e.storage().persistent().set(key, &((current + delta) as u64));
}

// ============================================================================
// Oracle adapter
// ============================================================================

/// Fetch, validate and normalize the latest quote for an asset.
///
/// Fails `InvalidPrice` when no feed is configured, the feed cannot be read,
/// the answer is not positive (before or after normalization), or the round
/// carries over a stale answer (`answered_in_round < round_id`). Fails `StalePrice` when the update
/// timestamp is zero or older than the staleness tolerance. The answer is
/// normalized to [`PRICE_DECIMALS`] with exact integer arithmetic.
fn price_quote(e: &Env, asset: &Asset) -> Result<i128, BankError> {
    let feed = e
        .storage()
        .instance()
        .get::<_, Address>(&DataKey::Feed(asset.clone()))
        .ok_or(BankError::InvalidPrice)?;
    let client = PriceFeedClient::new(e, &feed);

    let round = match client.try_latest_round() {
        Ok(Ok(round)) => round,
        _ => return Err(BankError::InvalidPrice),
    };
    if round.answer <= 0 {
        return Err(BankError::InvalidPrice);
    }
    if round.answered_in_round < round.round_id {
        return Err(BankError::InvalidPrice);
    }
    if round.updated_at == 0 {
        return Err(BankError::StalePrice);
    }
    if TimeUtils::is_older_than(e, round.updated_at, read_staleness(e)) {
        return Err(BankError::StalePrice);
    }

    let decimals = match client.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(BankError::InvalidPrice),
    };
    // a positive answer on a high-decimal feed can still truncate to zero
    let price_8 = SafeMath::rescale(round.answer, decimals, PRICE_DECIMALS);
    if price_8 <= 0 {
        return Err(BankError::InvalidPrice);
    }
    Ok(price_8)
}

// ============================================================================
// Limit enforcement
// ============================================================================

/// Maximum native amount withdrawable under a USD ceiling at a given price,
/// both at the 8-decimal price scale. Exact truncating integer math.
fn max_native_for(usd_ceiling_8: i128, price_8: i128) -> i128 {
    SafeMath::mul_div(usd_ceiling_8, NATIVE_UNIT, price_8)
}

fn check_custody_cap(projected_total: i128, cap: i128) -> Result<(), BankError> {
    if cap > 0 && projected_total > cap {
        return Err(BankError::CustodyCapExceeded);
    }
    Ok(())
}

fn check_flat_cap(amount: i128, flat_cap: i128) -> Result<(), BankError> {
    if flat_cap != 0 && amount > flat_cap {
        return Err(BankError::NativePerTxExceeded);
    }
    Ok(())
}

fn check_withdraw_limits(e: &Env, amount: i128) -> Result<(), BankError> {
    let price_8 = price_quote(e, &Asset::Native)?;
    let usd_ceiling_8 = SafeMath::mul(read_i128(e, &DataKey::UsdCeiling), USD_UNIT);
    if amount > max_native_for(usd_ceiling_8, price_8) {
        return Err(BankError::UsdLimitExceeded);
    }
    check_flat_cap(amount, read_i128(e, &DataKey::FlatCap))
}

// ============================================================================
// Re-entrancy guard
// ============================================================================

fn guard_enter(e: &Env) -> Result<(), BankError> {
    let held: bool = e
        .storage()
        .instance()
        .get::<_, bool>(&DataKey::ReentrancyGuard)
        .unwrap_or(false);
    if held {
        return Err(BankError::ReentrantCall);
    }
    e.storage().instance().set(&DataKey::ReentrancyGuard, &true);
    Ok(())
}

fn guard_exit(e: &Env) {
    e.storage().instance().set(&DataKey::ReentrancyGuard, &false);
}

/// Run a settlement body with the guard held, releasing it on every exit
/// path. A nested guarded call while one is in flight fails outright.
fn with_guard<T, F>(e: &Env, body: F) -> Result<T, BankError>
where
    F: FnOnce() -> Result<T, BankError>,
{
    guard_enter(e)?;
    let out = body();
    guard_exit(e);
    out
}

// ============================================================================
// Capability check
// ============================================================================

fn require_capability(e: &Env, caller: &Address) -> Result<(), BankError> {
    caller.require_auth();
    let registry = read_address(e, &DataKey::Registry)?;
    let holds = match CapabilityClient::new(e, &registry)
        .try_has_capability(caller, &ROLE_BANK_ADMIN)
    {
        Ok(Ok(holds)) => holds,
        _ => false,
    };
    if !holds {
        return Err(BankError::Unauthorized);
    }
    Ok(())
}

// ============================================================================
// Contract
// ============================================================================

#[contract]
pub struct CustodyBankContract;

#[contractimpl]
impl CustodyBankContract {
    /// Initialize the bank. Call once.
    ///
    /// `usd_ceiling` is the per-withdrawal USD ceiling in whole dollars;
    /// native withdrawals always consult the native price feed, so a zero
    /// ceiling blocks them entirely until raised.
    pub fn initialize(
        e: Env,
        registry: Address,
        native_token: Address,
        settlement_token: Address,
        exchange: Address,
        usd_ceiling: i128,
    ) -> Result<(), BankError> {
        if e.storage().instance().has(&DataKey::Registry) {
            return Err(BankError::AlreadyInitialized);
        }
        Validation::require_non_negative(usd_ceiling);
        e.storage().instance().set(&DataKey::Registry, &registry);
        e.storage().instance().set(&DataKey::NativeToken, &native_token);
        e.storage()
            .instance()
            .set(&DataKey::SettlementToken, &settlement_token);
        e.storage().instance().set(&DataKey::Exchange, &exchange);
        e.storage().instance().set(&DataKey::UsdCeiling, &usd_ceiling);
        e.storage().instance().set(&DataKey::FlatCap, &0i128);
        e.storage().instance().set(&DataKey::CustodyCap, &0i128);
        e.storage()
            .instance()
            .set(&DataKey::StalenessTolerance, &DEFAULT_STALENESS_SECONDS);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Settlement
    // ------------------------------------------------------------------

    /// Deposit an asset. `asset` is a raw reference: `None` or the native
    /// token address mean the native asset. The ledger is credited with the
    /// realized amount, measured as the bank's balance delta around the
    /// inbound transfer. Returns the credited amount.
    pub fn deposit(
        e: Env,
        from: Address,
        asset: Option<Address>,
        amount: i128,
    ) -> Result<i128, BankError> {
        from.require_auth();
        with_guard(&e, || {
            if amount <= 0 {
                return Err(BankError::ZeroAmount);
            }
            let native_token = read_address(&e, &DataKey::NativeToken)?;
            let asset = canonicalize(&asset, &native_token);
            let client = token::Client::new(&e, &asset.contract(&native_token));
            let me = e.current_contract_address();

            let held_before = client.balance(&me);
            match client.try_transfer(&from, &me, &amount) {
                Ok(Ok(())) => (),
                _ => return Err(BankError::TransferFailed),
            }
            let held_after = client.balance(&me);
            let realized = SafeMath::sub(held_after, held_before);
            if realized <= 0 {
                return Err(BankError::ZeroAmount);
            }

            // The value has already arrived, so the native projection is the
            // actual held balance; token projections use the recorded total.
            let cap = read_i128(&e, &DataKey::CustodyCap);
            let projected = match asset {
                Asset::Native => held_after,
                Asset::Token(_) => SafeMath::add(total_of(&e, &asset), realized),
            };
            check_custody_cap(projected, cap)?;

            credit(&e, &asset, &from, realized);
            bump_counter(&e, &DataKey::DepositCount, 1);
            Events::emit_deposit(&e, &from, asset, realized);
            Ok(realized)
        })
    }

    /// Withdraw an asset back to its owner. The ledger is debited before
    /// the outbound transfer; if that transfer fails the debit is reversed
    /// and the call fails, leaving state exactly as before.
    pub fn withdraw(
        e: Env,
        to: Address,
        asset: Option<Address>,
        amount: i128,
    ) -> Result<(), BankError> {
        to.require_auth();
        with_guard(&e, || {
            if amount <= 0 {
                return Err(BankError::ZeroAmount);
            }
            let native_token = read_address(&e, &DataKey::NativeToken)?;
            let asset = canonicalize(&asset, &native_token);
            if amount > balance_of(&e, &asset, &to) {
                return Err(BankError::InsufficientBalance);
            }
            if asset == Asset::Native {
                check_withdraw_limits(&e, amount)?;
            }

            debit(&e, &asset, &to, amount)?;
            bump_counter(&e, &DataKey::WithdrawCount, 1);

            let client = token::Client::new(&e, &asset.contract(&native_token));
            let me = e.current_contract_address();
            match client.try_transfer(&me, &to, &amount) {
                Ok(Ok(())) => (),
                _ => {
                    reverse_debit(&e, &asset, &to, amount);
                    bump_counter(&e, &DataKey::WithdrawCount, -1);
                    return Err(BankError::TransferFailed);
                }
            }

            Events::emit_withdraw(&e, &to, asset, amount);
            Ok(())
        })
    }

    /// Deposit through the conversion path: pull `asset_in` from the caller,
    /// swap it on the configured exchange, and credit the realized amount of
    /// the settlement asset. Returns the credited amount.
    pub fn deposit_via_swap(
        e: Env,
        from: Address,
        asset_in: Address,
        amount_in: i128,
        min_out: i128,
    ) -> Result<i128, BankError> {
        from.require_auth();
        with_guard(&e, || {
            if amount_in <= 0 {
                return Err(BankError::ZeroAmount);
            }
            let native_token = read_address(&e, &DataKey::NativeToken)?;
            let settlement_token = read_address(&e, &DataKey::SettlementToken)?;
            let exchange = read_address(&e, &DataKey::Exchange)?;
            if asset_in == settlement_token {
                return Err(BankError::AssetMismatch);
            }
            let me = e.current_contract_address();

            let in_client = token::Client::new(&e, &asset_in);
            let in_before = in_client.balance(&me);
            match in_client.try_transfer(&from, &me, &amount_in) {
                Ok(Ok(())) => (),
                _ => return Err(BankError::TransferFailed),
            }
            let pulled = SafeMath::sub(in_client.balance(&me), in_before);
            if pulled <= 0 {
                return Err(BankError::ZeroAmount);
            }

            let realized = convert(
                &e,
                &exchange,
                &asset_in,
                &settlement_token,
                pulled,
                min_out,
            )?;

            let settle_asset = canonicalize(&Some(settlement_token), &native_token);
            check_custody_cap(
                SafeMath::add(total_of(&e, &settle_asset), realized),
                read_i128(&e, &DataKey::CustodyCap),
            )?;

            credit(&e, &settle_asset, &from, realized);
            bump_counter(&e, &DataKey::DepositCount, 1);
            Events::emit_converted(&e, &from, &asset_in, pulled, realized);
            Ok(realized)
        })
    }

    /// Withdraw through the conversion path: debit `amount` of the
    /// settlement asset, swap it into `asset_out`, and deliver the realized
    /// amount to the owner. Returns the delivered amount.
    pub fn withdraw_via_swap(
        e: Env,
        to: Address,
        asset_out: Address,
        amount: i128,
        min_out: i128,
    ) -> Result<i128, BankError> {
        to.require_auth();
        with_guard(&e, || {
            if amount <= 0 {
                return Err(BankError::ZeroAmount);
            }
            let native_token = read_address(&e, &DataKey::NativeToken)?;
            let settlement_token = read_address(&e, &DataKey::SettlementToken)?;
            let exchange = read_address(&e, &DataKey::Exchange)?;
            if asset_out == settlement_token {
                return Err(BankError::AssetMismatch);
            }
            let settle_asset = canonicalize(&Some(settlement_token.clone()), &native_token);
            if amount > balance_of(&e, &settle_asset, &to) {
                return Err(BankError::InsufficientBalance);
            }

            debit(&e, &settle_asset, &to, amount)?;
            bump_counter(&e, &DataKey::WithdrawCount, 1);

            let rollback = |err: BankError| {
                reverse_debit(&e, &settle_asset, &to, amount);
                bump_counter(&e, &DataKey::WithdrawCount, -1);
                err
            };

            let realized = match convert(
                &e,
                &exchange,
                &settlement_token,
                &asset_out,
                amount,
                min_out,
            ) {
                Ok(realized) => realized,
                Err(err) => return Err(rollback(err)),
            };

            let out_client = token::Client::new(&e, &asset_out);
            let me = e.current_contract_address();
            match out_client.try_transfer(&me, &to, &realized) {
                Ok(Ok(())) => (),
                _ => return Err(rollback(BankError::TransferFailed)),
            }

            Events::emit_converted(&e, &to, &asset_out, amount, realized);
            Ok(realized)
        })
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Recorded balance of an account in an asset.
    pub fn balance(e: Env, account: Address, asset: Option<Address>) -> Result<i128, BankError> {
        let native_token = read_address(&e, &DataKey::NativeToken)?;
        Ok(balance_of(&e, &canonicalize(&asset, &native_token), &account))
    }

    /// Running custody total for an asset.
    pub fn total(e: Env, asset: Option<Address>) -> Result<i128, BankError> {
        let native_token = read_address(&e, &DataKey::NativeToken)?;
        Ok(total_of(&e, &canonicalize(&asset, &native_token)))
    }

    /// Completed deposit count.
    pub fn deposit_count(e: Env) -> u64 {
        read_counter(&e, &DataKey::DepositCount)
    }

    /// Completed withdrawal count.
    pub fn withdraw_count(e: Env) -> u64 {
        read_counter(&e, &DataKey::WithdrawCount)
    }

    /// Current limit configuration.
    pub fn limit_config(e: Env) -> LimitConfig {
        LimitConfig {
            usd_ceiling: read_i128(&e, &DataKey::UsdCeiling),
            flat_cap: read_i128(&e, &DataKey::FlatCap),
            custody_cap: read_i128(&e, &DataKey::CustodyCap),
            staleness_tolerance: read_staleness(&e),
        }
    }

    /// Maximum native amount currently withdrawable under the USD ceiling,
    /// at the current valid price.
    pub fn max_native_withdrawable(e: Env) -> Result<i128, BankError> {
        let price_8 = price_quote(&e, &Asset::Native)?;
        let usd_ceiling_8 = SafeMath::mul(read_i128(&e, &DataKey::UsdCeiling), USD_UNIT);
        Ok(max_native_for(usd_ceiling_8, price_8))
    }

    /// Configured feed for an asset, if any.
    pub fn price_feed_of(e: Env, asset: Option<Address>) -> Result<Option<Address>, BankError> {
        let native_token = read_address(&e, &DataKey::NativeToken)?;
        let asset = canonicalize(&asset, &native_token);
        Ok(e.storage().instance().get::<_, Address>(&DataKey::Feed(asset)))
    }

    /// The configured native token contract.
    pub fn native_token(e: Env) -> Result<Address, BankError> {
        read_address(&e, &DataKey::NativeToken)
    }

    /// The configured settlement token contract.
    pub fn settlement_token(e: Env) -> Result<Address, BankError> {
        read_address(&e, &DataKey::SettlementToken)
    }

    // ------------------------------------------------------------------
    // Admin surface (capability-checked through the registry)
    // ------------------------------------------------------------------

    /// Set the flat per-transaction native cap. Zero disables it.
    pub fn set_flat_cap(e: Env, caller: Address, amount: i128) -> Result<(), BankError> {
        require_capability(&e, &caller)?;
        Validation::require_non_negative(amount);
        e.storage().instance().set(&DataKey::FlatCap, &amount);
        Events::emit_config_set(&e, &caller, symbol_short!("flat_cap"), amount);
        Ok(())
    }

    /// Set the global custody cap. Zero removes the cap.
    pub fn set_custody_cap(e: Env, caller: Address, amount: i128) -> Result<(), BankError> {
        require_capability(&e, &caller)?;
        Validation::require_non_negative(amount);
        e.storage().instance().set(&DataKey::CustodyCap, &amount);
        Events::emit_config_set(&e, &caller, symbol_short!("bank_cap"), amount);
        Ok(())
    }

    /// Set the USD withdrawal ceiling in whole dollars.
    pub fn set_usd_ceiling(e: Env, caller: Address, dollars: i128) -> Result<(), BankError> {
        require_capability(&e, &caller)?;
        Validation::require_non_negative(dollars);
        e.storage().instance().set(&DataKey::UsdCeiling, &dollars);
        Events::emit_config_set(&e, &caller, symbol_short!("usd_max"), dollars);
        Ok(())
    }

    /// Set the price staleness tolerance in seconds.
    pub fn set_staleness_tolerance(e: Env, caller: Address, seconds: u64) -> Result<(), BankError> {
        require_capability(&e, &caller)?;
        e.storage()
            .instance()
            .set(&DataKey::StalenessTolerance, &seconds);
        Events::emit_config_set(&e, &caller, symbol_short!("staleness"), seconds as i128);
        Ok(())
    }

    /// Configure the feed consulted for an asset's price.
    pub fn set_price_feed(
        e: Env,
        caller: Address,
        asset: Option<Address>,
        feed: Address,
    ) -> Result<(), BankError> {
        require_capability(&e, &caller)?;
        let native_token = read_address(&e, &DataKey::NativeToken)?;
        let asset = canonicalize(&asset, &native_token);
        e.storage().instance().set(&DataKey::Feed(asset.clone()), &feed);
        e.events().publish(
            (symbol_short!("FeedSet"), caller),
            (asset, feed, e.ledger().timestamp()),
        );
        Ok(())
    }

    /// Administratively override a recorded balance. The custody total is
    /// adjusted by the old/new delta so it keeps equaling the sum of the
    /// individual balances.
    pub fn override_balance(
        e: Env,
        caller: Address,
        account: Address,
        asset: Option<Address>,
        amount: i128,
    ) -> Result<(), BankError> {
        require_capability(&e, &caller)?;
        Validation::require_non_negative(amount);
        let native_token = read_address(&e, &DataKey::NativeToken)?;
        let asset = canonicalize(&asset, &native_token);

        let old = balance_of(&e, &asset, &account);
        write_balance(&e, &asset, &account, amount);
        let delta = SafeMath::sub(amount, old);
        write_total(&e, &asset, SafeMath::add(total_of(&e, &asset), delta));

        e.events().publish(
            (symbol_short!("Override"), account),
            (asset, old, amount, e.ledger().timestamp()),
        );
        Ok(())
    }
}

// ============================================================================
// Swap leg
// ============================================================================

/// Move `amount_in` of `sell` to the venue, invoke it, and measure the
/// realized amount of `buy` as the bank's balance delta around the call.
/// The venue's reported figure is deliberately ignored; a venue that traps,
/// lies, or moves nothing surfaces here as `SwapReturnedZero`.
fn convert(
    e: &Env,
    exchange: &Address,
    sell: &Address,
    buy: &Address,
    amount_in: i128,
    min_out: i128,
) -> Result<i128, BankError> {
    let me = e.current_contract_address();
    let sell_client = token::Client::new(e, sell);
    let buy_client = token::Client::new(e, buy);

    let buy_before = buy_client.balance(&me);
    match sell_client.try_transfer(&me, exchange, &amount_in) {
        Ok(Ok(())) => (),
        _ => return Err(BankError::TransferFailed),
    }
    let _reported = ExchangeClient::new(e, exchange).try_swap(
        &me,
        sell,
        buy,
        &amount_in,
        &min_out,
    );
    let realized = SafeMath::sub(buy_client.balance(&me), buy_before);
    if realized <= 0 {
        return Err(BankError::SwapReturnedZero);
    }
    Ok(realized)
}
