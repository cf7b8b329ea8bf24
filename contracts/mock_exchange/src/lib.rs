#![no_std]

//! Configurable swap venue for exercising the custody bank's conversion path.
//!
//! The venue quotes from a fixed rate table and pays out from its own token
//! balance, so tests must pre-fund it with the buy-side asset. Two fault
//! knobs cover the venue behaviors the bank has to survive: `set_fill_bps`
//! makes it deliver only a fraction of the quote, and `set_reported` makes
//! its return value disagree with what it actually moved.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VenueError {
    NoRate = 1,
    BelowMinOut = 2,
}

/// Quote rate for one ordered pair: `amount_in * num / den` units of the
/// buy asset per `amount_in` of the sell asset.
#[contracttype]
#[derive(Clone)]
pub struct Rate {
    pub num: i128,
    pub den: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Rate(Address, Address),
    FillBps,
    Reported,
}

const BPS_DENOM: i128 = 10_000;

#[contract]
pub struct MockExchangeContract;

#[contractimpl]
impl MockExchangeContract {
    /// Install the quote rate for an ordered (sell, buy) pair.
    pub fn set_rate(e: Env, sell: Address, buy: Address, num: i128, den: i128) {
        e.storage()
            .instance()
            .set(&DataKey::Rate(sell, buy), &Rate { num, den });
    }

    /// Fraction of the quote actually delivered, in basis points.
    /// 10_000 delivers the full quote; 0 delivers nothing.
    pub fn set_fill_bps(e: Env, bps: u32) {
        e.storage().instance().set(&DataKey::FillBps, &bps);
    }

    /// Override the figure `swap` returns, independent of what it delivers.
    /// Clearing the override makes it report the delivered amount again.
    pub fn set_reported(e: Env, reported: Option<i128>) {
        match reported {
            Some(value) => e.storage().instance().set(&DataKey::Reported, &value),
            None => {
                e.storage().instance().remove(&DataKey::Reported);
            }
        }
    }

    /// Swap `amount_in` of `sell` (already transferred to the venue by the
    /// caller) into `buy`, delivering to `to`. Returns the reported amount,
    /// which a misconfigured venue may not have delivered.
    pub fn swap(
        e: Env,
        to: Address,
        sell: Address,
        buy: Address,
        amount_in: i128,
        min_out: i128,
    ) -> Result<i128, VenueError> {
        let rate = e
            .storage()
            .instance()
            .get::<_, Rate>(&DataKey::Rate(sell.clone(), buy.clone()))
            .ok_or(VenueError::NoRate)?;
        let quoted = amount_in * rate.num / rate.den;
        if quoted < min_out {
            return Err(VenueError::BelowMinOut);
        }

        let fill_bps = e
            .storage()
            .instance()
            .get::<_, u32>(&DataKey::FillBps)
            .unwrap_or(10_000);
        let delivered = quoted * fill_bps as i128 / BPS_DENOM;
        if delivered > 0 {
            let me = e.current_contract_address();
            token::Client::new(&e, &buy).transfer(&me, &to, &delivered);
        }

        let reported = e
            .storage()
            .instance()
            .get::<_, i128>(&DataKey::Reported)
            .unwrap_or(delivered);
        e.events()
            .publish((symbol_short!("swap"), to), (sell, buy, amount_in, reported));
        Ok(reported)
    }
}
