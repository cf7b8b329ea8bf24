#![no_std]

//! Round-based price feed for the custody workspace.
//!
//! Whitelisted feeders publish monotonically numbered rounds; consumers read
//! the latest round and judge its validity themselves. The feed deliberately
//! does not range-check answers: a feed can report garbage, and defending
//! against that is the consuming contract's job. The admin can install an
//! arbitrary round verbatim (`set_round`) to correct a bad publication or to
//! stage carried-over or backdated rounds.

use shared_utils::{AccessControl, Storage, TimeUtils, Validation};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Symbol,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FeedError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    NoRound = 4,
}

/// One published price round. `answered_in_round` equals `round_id` for a
/// freshly answered round; a smaller value marks a carried-over answer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub updated_at: u64,
    pub answered_in_round: u64,
}

#[contracttype]
pub enum DataKey {
    /// Fixed decimal count of every answer this feed reports
    Decimals,
    /// Latest published round
    LatestRound,
}

const FEEDERS: Symbol = symbol_short!("FEEDERS");

#[contract]
pub struct PriceFeedContract;

#[contractimpl]
impl PriceFeedContract {
    /// Initialize the feed with an admin and a fixed decimal count. Call once.
    pub fn initialize(e: Env, admin: Address, decimals: u32) -> Result<(), FeedError> {
        if Storage::is_initialized(&e) {
            return Err(FeedError::AlreadyInitialized);
        }
        Validation::require_valid_decimals(decimals);
        Storage::set_initialized(&e);
        Storage::set_admin(&e, &admin);
        e.storage().instance().set(&DataKey::Decimals, &decimals);
        Ok(())
    }

    /// Add an address to the feeder whitelist. Admin only.
    pub fn add_feeder(e: Env, caller: Address, feeder: Address) {
        AccessControl::require_admin(&e, &caller);
        AccessControl::set_member(&e, &FEEDERS, &feeder, true);
    }

    /// Remove an address from the feeder whitelist. Admin only.
    pub fn remove_feeder(e: Env, caller: Address, feeder: Address) {
        AccessControl::require_admin(&e, &caller);
        AccessControl::set_member(&e, &FEEDERS, &feeder, false);
    }

    /// Check if an address is a whitelisted feeder.
    pub fn is_feeder(e: Env, address: Address) -> bool {
        AccessControl::is_member(&e, &FEEDERS, &address)
    }

    /// Publish a fresh answer. Caller must be admin or a whitelisted feeder.
    /// Opens round `previous + 1` answered in its own round at the current
    /// ledger time.
    pub fn submit(e: Env, caller: Address, answer: i128) -> u64 {
        AccessControl::require_admin_or_member(&e, &caller, &FEEDERS);

        let round_id = Self::latest_round_id(&e) + 1;
        let round = RoundData {
            round_id,
            answer,
            updated_at: TimeUtils::now(&e),
            answered_in_round: round_id,
        };
        e.storage().instance().set(&DataKey::LatestRound, &round);
        e.events().publish(
            (symbol_short!("NewRound"), round_id),
            (answer, round.updated_at),
        );
        round_id
    }

    /// Install a round verbatim, including its id, timestamp, and
    /// answered-in-round marker. Admin only.
    pub fn set_round(e: Env, caller: Address, round: RoundData) {
        AccessControl::require_admin(&e, &caller);
        e.storage().instance().set(&DataKey::LatestRound, &round);
        e.events().publish(
            (symbol_short!("NewRound"), round.round_id),
            (round.answer, round.updated_at),
        );
    }

    /// Get the latest published round.
    pub fn latest_round(e: Env) -> Result<RoundData, FeedError> {
        e.storage()
            .instance()
            .get::<_, RoundData>(&DataKey::LatestRound)
            .ok_or(FeedError::NoRound)
    }

    /// Convenience getter for the latest answer.
    pub fn latest_answer(e: Env) -> Result<i128, FeedError> {
        Ok(Self::latest_round(e)?.answer)
    }

    /// Fixed decimal count of this feed's answers.
    pub fn decimals(e: Env) -> Result<u32, FeedError> {
        e.storage()
            .instance()
            .get::<_, u32>(&DataKey::Decimals)
            .ok_or(FeedError::NotInitialized)
    }

    /// Get admin address.
    pub fn get_admin(e: Env) -> Address {
        Storage::get_admin(&e)
    }

    fn latest_round_id(e: &Env) -> u64 {
        e.storage()
            .instance()
            .get::<_, RoundData>(&DataKey::LatestRound)
            .map(|r| r.round_id)
            .unwrap_or(0)
    }
}
