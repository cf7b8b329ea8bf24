//! Administrative surface: capability grants through the registry and the
//! configuration they gate.

use crate::harness::{units, TestHarness, USD};
use custody_bank::{BankError, DEFAULT_STALENESS_SECONDS, ROLE_BANK_ADMIN};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::Address;

#[test]
fn test_limit_defaults_after_initialize() {
    let h = TestHarness::new();
    let config = h.bank.limit_config();
    assert_eq!(config.usd_ceiling, 1_000);
    assert_eq!(config.flat_cap, 0);
    assert_eq!(config.custody_cap, 0);
    assert_eq!(config.staleness_tolerance, DEFAULT_STALENESS_SECONDS);

    assert_eq!(h.bank.native_token(), h.native);
    assert_eq!(h.bank.settlement_token(), h.settlement);
}

#[test]
fn test_registry_admin_holds_capability_implicitly() {
    let h = TestHarness::new();
    // never explicitly granted, yet every harness setter call works
    assert!(h.registry.has_capability(&h.accounts.admin, &ROLE_BANK_ADMIN));
    h.bank.set_flat_cap(&h.accounts.admin, &units(5));
    assert_eq!(h.bank.limit_config().flat_cap, units(5));
}

#[test]
fn test_granted_operator_can_configure_until_revoked() {
    let h = TestHarness::new();
    let operator = Address::generate(&h.env);

    assert_eq!(
        h.bank.try_set_custody_cap(&operator, &units(100)),
        Err(Ok(BankError::Unauthorized))
    );

    h.grant_bank_admin(&operator);
    h.bank.set_custody_cap(&operator, &units(100));
    assert_eq!(h.bank.limit_config().custody_cap, units(100));

    h.registry
        .revoke(&h.accounts.admin, &operator, &ROLE_BANK_ADMIN);
    assert_eq!(
        h.bank.try_set_custody_cap(&operator, &units(200)),
        Err(Ok(BankError::Unauthorized))
    );
    assert_eq!(h.bank.limit_config().custody_cap, units(100));
}

#[test]
fn test_attacker_cannot_touch_configuration() {
    let h = TestHarness::new();
    let attacker = &h.accounts.attacker;
    let feed = h.bank.price_feed_of(&None).unwrap();

    assert_eq!(
        h.bank.try_set_flat_cap(attacker, &1),
        Err(Ok(BankError::Unauthorized))
    );
    assert_eq!(
        h.bank.try_set_custody_cap(attacker, &1),
        Err(Ok(BankError::Unauthorized))
    );
    assert_eq!(
        h.bank.try_set_usd_ceiling(attacker, &1),
        Err(Ok(BankError::Unauthorized))
    );
    assert_eq!(
        h.bank.try_set_staleness_tolerance(attacker, &1),
        Err(Ok(BankError::Unauthorized))
    );
    assert_eq!(
        h.bank.try_set_price_feed(attacker, &None, &feed),
        Err(Ok(BankError::Unauthorized))
    );
    assert_eq!(
        h.bank
            .try_override_balance(attacker, &h.accounts.user1, &None, &1),
        Err(Ok(BankError::Unauthorized))
    );
    // nothing moved
    assert_eq!(h.bank.limit_config().usd_ceiling, 1_000);
    assert_eq!(h.bank.price_feed_of(&None), Some(feed));
}

#[test]
fn test_usd_ceiling_change_applies_to_next_withdrawal() {
    let h = TestHarness::new();
    let user = &h.accounts.user1;
    h.mint_native(user, units(2_000));
    h.bank.deposit(user, &None, &units(2_000));

    // $2.00 price: $1000 allows 500 units
    assert_eq!(
        h.bank.try_withdraw(user, &None, &units(600)),
        Err(Ok(BankError::UsdLimitExceeded))
    );

    h.bank.set_usd_ceiling(&h.accounts.admin, &4_000);
    h.bank.withdraw(user, &None, &units(600));

    // a zero ceiling blocks native withdrawals outright
    h.bank.set_usd_ceiling(&h.accounts.admin, &0);
    assert_eq!(
        h.bank.try_withdraw(user, &None, &units(1)),
        Err(Ok(BankError::UsdLimitExceeded))
    );
}

#[test]
fn test_override_balance_keeps_total_consistent() {
    let h = TestHarness::new();
    h.mint_native(&h.accounts.user1, units(60));
    h.mint_native(&h.accounts.user2, units(40));
    h.bank.deposit(&h.accounts.user1, &None, &units(60));
    h.bank.deposit(&h.accounts.user2, &None, &units(40));

    h.bank
        .override_balance(&h.accounts.admin, &h.accounts.user1, &None, &units(10));

    assert_eq!(h.bank.balance(&h.accounts.user1, &None), units(10));
    assert_eq!(h.bank.balance(&h.accounts.user2, &None), units(40));
    assert_eq!(h.bank.total(&None), units(50));

    // the overridden position behaves like any other
    h.publish_price(1 * USD);
    h.bank.withdraw(&h.accounts.user1, &None, &units(10));
    assert_eq!(h.bank.total(&None), units(40));
}

#[test]
fn test_per_asset_price_feeds() {
    let h = TestHarness::new();
    let token = h.settlement.clone();
    assert_eq!(h.bank.price_feed_of(&Some(token.clone())), None);

    let feed = h.bank.price_feed_of(&None).unwrap();
    h.bank
        .set_price_feed(&h.accounts.admin, &Some(token.clone()), &feed);
    assert_eq!(h.bank.price_feed_of(&Some(token)), Some(feed));
}
