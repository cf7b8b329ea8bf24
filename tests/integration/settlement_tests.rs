//! Deposit/withdraw flows against the fully wired deployment.

use crate::harness::{units, TestHarness, USD};
use custody_bank::BankError;

// ============================================================================
// Native flows
// ============================================================================

#[test]
fn test_native_deposit_withdraw_roundtrip() {
    let h = TestHarness::new();
    let user = &h.accounts.user1;
    h.mint_native(user, units(100));

    let credited = h.bank.deposit(user, &None, &units(100));
    assert_eq!(credited, units(100));
    assert_eq!(h.native_balance(user), 0);
    assert_eq!(h.native_balance(&h.bank.address), units(100));
    assert_eq!(h.bank.balance(user, &None), units(100));
    assert_eq!(h.bank.total(&None), units(100));

    h.bank.withdraw(user, &None, &units(100));
    assert_eq!(h.native_balance(user), units(100));
    assert_eq!(h.bank.balance(user, &None), 0);
    assert_eq!(h.bank.total(&None), 0);
    assert_eq!(h.bank.deposit_count(), 1);
    assert_eq!(h.bank.withdraw_count(), 1);
}

#[test]
fn test_native_alias_reference_is_same_asset() {
    let h = TestHarness::new();
    let user = &h.accounts.user1;
    h.mint_native(user, units(10));

    h.bank.deposit(user, &Some(h.native.clone()), &units(6));
    h.bank.deposit(user, &None, &units(4));

    assert_eq!(h.bank.balance(user, &None), units(10));
    assert_eq!(h.bank.balance(user, &Some(h.native.clone())), units(10));
    assert_eq!(h.bank.total(&None), units(10));

    // withdrawing under the alias draws from the same position
    h.bank.withdraw(user, &Some(h.native.clone()), &units(10));
    assert_eq!(h.bank.balance(user, &None), 0);
}

#[test]
fn test_total_is_sum_of_balances_across_users() {
    let h = TestHarness::new();
    h.mint_native(&h.accounts.user1, units(70));
    h.mint_native(&h.accounts.user2, units(50));

    h.bank.deposit(&h.accounts.user1, &None, &units(70));
    h.bank.deposit(&h.accounts.user2, &None, &units(50));
    h.bank.withdraw(&h.accounts.user1, &None, &units(20));

    let sum = h.bank.balance(&h.accounts.user1, &None) + h.bank.balance(&h.accounts.user2, &None);
    assert_eq!(sum, units(100));
    assert_eq!(h.bank.total(&None), sum);
    // one user's movements never touch the other's position
    assert_eq!(h.bank.balance(&h.accounts.user2, &None), units(50));
}

// ============================================================================
// Token flows
// ============================================================================

#[test]
fn test_token_positions_keyed_independently() {
    let h = TestHarness::new();
    let user = &h.accounts.user1;
    h.mint_native(user, units(10));
    h.mint_settlement(user, 5_000);

    h.bank.deposit(user, &None, &units(10));
    h.bank.deposit(user, &Some(h.settlement.clone()), &5_000);

    assert_eq!(h.bank.balance(user, &None), units(10));
    assert_eq!(h.bank.balance(user, &Some(h.settlement.clone())), 5_000);
    assert_eq!(h.bank.total(&Some(h.settlement.clone())), 5_000);
    assert_eq!(h.bank.total(&None), units(10));
}

#[test]
fn test_token_withdraw_needs_no_price() {
    // no round was ever published on this deployment
    let h = TestHarness::new_without_price();
    let user = &h.accounts.user1;
    h.mint_settlement(user, 1_000);

    h.bank.deposit(user, &Some(h.settlement.clone()), &1_000);
    h.bank.withdraw(user, &Some(h.settlement.clone()), &1_000);
    assert_eq!(h.settlement_balance(user), 1_000);
}

// ============================================================================
// Limits in the full deployment
// ============================================================================

#[test]
fn test_usd_ceiling_tracks_published_price() {
    let h = TestHarness::new();
    let user = &h.accounts.user1;
    h.mint_native(user, units(1_000));
    h.bank.deposit(user, &None, &units(1_000));

    // $2.00: the $1000 ceiling allows 500 units
    assert_eq!(h.bank.max_native_withdrawable(), units(500));
    assert_eq!(
        h.bank.try_withdraw(user, &None, &(units(500) + 1)),
        Err(Ok(BankError::UsdLimitExceeded))
    );
    h.bank.withdraw(user, &None, &units(500));

    // price halves: the ceiling allows twice the native amount
    h.publish_price(1 * USD);
    assert_eq!(h.bank.max_native_withdrawable(), units(1_000));
    h.bank.withdraw(user, &None, &units(500));
    assert_eq!(h.bank.balance(user, &None), 0);
}

#[test]
fn test_flat_cap_binds_alongside_usd_ceiling() {
    let h = TestHarness::new();
    let user = &h.accounts.user1;
    h.mint_native(user, units(600));
    h.bank.deposit(user, &None, &units(600));

    h.bank.set_flat_cap(&h.accounts.admin, &units(50));

    // under the USD ceiling but over the flat cap
    assert_eq!(
        h.bank.try_withdraw(user, &None, &units(51)),
        Err(Ok(BankError::NativePerTxExceeded))
    );
    // several cap-sized withdrawals still pass
    h.bank.withdraw(user, &None, &units(50));
    h.bank.withdraw(user, &None, &units(50));
    assert_eq!(h.bank.balance(user, &None), units(500));
}

// ============================================================================
// End-to-end: custody cap walkthrough
// ============================================================================

#[test]
fn test_custody_cap_end_to_end() {
    let h = TestHarness::new();
    h.publish_price(1 * USD);
    h.bank.set_custody_cap(&h.accounts.admin, &units(1_000));
    let user = &h.accounts.user1;
    h.mint_native(user, units(1_200));

    // deposit 600 passes
    h.bank.deposit(user, &None, &units(600));
    assert_eq!(h.bank.balance(user, &None), units(600));

    // deposit 500 would breach the 1000 cap
    assert_eq!(
        h.bank.try_deposit(user, &None, &units(500)),
        Err(Ok(BankError::CustodyCapExceeded))
    );
    assert_eq!(h.bank.balance(user, &None), units(600));
    assert_eq!(h.bank.total(&None), units(600));
    // the failed deposit moved no funds
    assert_eq!(h.native_balance(user), units(600));

    // withdrawing more than the recorded balance fails
    assert_eq!(
        h.bank.try_withdraw(user, &None, &units(700)),
        Err(Ok(BankError::InsufficientBalance))
    );

    // the full recorded balance can leave
    h.bank.withdraw(user, &None, &units(600));
    assert_eq!(h.bank.balance(user, &None), 0);
    assert_eq!(h.bank.total(&None), 0);
    assert_eq!(h.native_balance(user), units(1_200));
}

#[test]
fn test_counters_count_completed_operations_only() {
    let h = TestHarness::new();
    let user = &h.accounts.user1;
    h.mint_native(user, units(10));

    let _ = h.bank.try_deposit(user, &None, &0);
    let _ = h.bank.try_withdraw(user, &None, &units(1));
    assert_eq!(h.bank.deposit_count(), 0);
    assert_eq!(h.bank.withdraw_count(), 0);

    h.bank.deposit(user, &None, &units(10));
    h.bank.withdraw(user, &None, &units(10));
    assert_eq!(h.bank.deposit_count(), 1);
    assert_eq!(h.bank.withdraw_count(), 1);
}
