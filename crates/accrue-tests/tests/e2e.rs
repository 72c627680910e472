//! End-to-end lifecycle tests for the accrue ledger.
//!
//! Each test wires a ledger to in-memory custody and reward token, runs
//! deposit/withdraw cycles across several accounts, and checks the account
//! table, custody pool and reward supply after every step.

use accrue_core::constants::SECONDS_PER_YEAR;
use accrue_core::error::{LedgerError, MintError, TransferError};
use accrue_core::reward::MemoryRewardToken;
use accrue_core::traits::NativeCustody;
use accrue_core::types::{AccountId, DepositRecord};
use accrue_core::SharedLedger;
use accrue_tests::helpers::*;

// ======================================================================
// E2E Test 1: single account, full year
// ======================================================================

#[test]
fn e2e_single_account_one_year() {
    let mut bed = TestBed::new(10);
    bed.fund(1, 2 * MIN);

    bed.ledger.deposit(&acct(0), 2 * MIN, 1_000).unwrap();
    assert_eq!(bed.custody.custody_balance(), 2 * MIN);
    bed.ledger.audit().unwrap();

    let s = bed.ledger.withdraw(&acct(0), 1_000 + UNITS_PER_YEAR).unwrap();
    assert_eq!(s.elapsed_time_units, UNITS_PER_YEAR);
    assert_eq!(s.elapsed_seconds, SECONDS_PER_YEAR);
    assert_eq!(s.interest, 2 * (MIN * 10 / 100));

    assert_eq!(bed.custody.balance_of(&acct(0)), 2 * MIN);
    assert_eq!(bed.custody.custody_balance(), 0);
    assert_eq!(bed.token.balance_of(&acct(0)), s.interest);
    assert_eq!(bed.ledger.investor(&acct(0)).unwrap(), DepositRecord::INACTIVE);
    bed.ledger.audit().unwrap();
}

// ======================================================================
// E2E Test 2: many accounts, staggered
// ======================================================================

#[test]
fn e2e_staggered_accounts_settle_independently() {
    let mut bed = TestBed::new(25);
    bed.fund(4, 4 * MIN);

    for i in 0..4 {
        let amount = (i as u128 + 1) * MIN;
        bed.ledger.deposit(&acct(i), amount, (i as u64) * 100).unwrap();
        bed.ledger.audit().unwrap();
    }
    assert_eq!(bed.ledger.total_principal().unwrap(), 10 * MIN);

    let per_second = bed.ledger.interest_per_second_for_min_deposit();
    let close_at = 10_000;
    let mut minted = 0;
    for i in (0..4).rev() {
        let s = bed.ledger.withdraw(&acct(i), close_at).unwrap();
        let expected_seconds = (close_at - (i as u64) * 100) * SPU;
        assert_eq!(s.elapsed_seconds, expected_seconds);
        assert_eq!(s.interest, per_second * (i as u128 + 1) * expected_seconds as u128);
        minted += s.interest;
        bed.ledger.audit().unwrap();
    }

    assert_eq!(bed.token.total_supply(), minted);
    assert_eq!(bed.wallet_total(4), 16 * MIN);
    assert_eq!(bed.custody.custody_balance(), 0);
}

// ======================================================================
// E2E Test 3: repeated cycles on one account
// ======================================================================

#[test]
fn e2e_repeated_cycles_reuse_record() {
    let mut bed = TestBed::new(5);
    bed.fund(1, MIN);

    let mut now = 0;
    let mut total_interest = 0;
    for cycle in 0..5u64 {
        bed.ledger.deposit(&acct(0), MIN, now).unwrap();
        now += 1_000 * (cycle + 1);
        let s = bed.ledger.withdraw(&acct(0), now).unwrap();
        total_interest += s.interest;
        assert_eq!(bed.ledger.investor(&acct(0)).unwrap(), DepositRecord::INACTIVE);
    }

    assert_eq!(bed.custody.balance_of(&acct(0)), MIN);
    assert_eq!(bed.token.balance_of(&acct(0)), total_interest);
    assert!(total_interest > 0);
}

// ======================================================================
// E2E Test 4: failures leave everything untouched
// ======================================================================

#[test]
fn e2e_rejected_calls_change_nothing() {
    let mut bed = TestBed::new(10);
    bed.fund(2, 3 * MIN);
    bed.ledger.deposit(&acct(0), MIN, 10).unwrap();

    let before = bed.ledger.investor(&acct(0)).unwrap();
    let custody_before = bed.custody.custody_balance();

    assert!(matches!(
        bed.ledger.deposit(&acct(0), MIN, 20),
        Err(LedgerError::ActiveDepositExists(_))
    ));
    assert!(matches!(
        bed.ledger.deposit(&acct(1), MIN - 1, 20),
        Err(LedgerError::InsufficientAmount { .. })
    ));
    assert!(matches!(
        bed.ledger.withdraw(&acct(1), 20),
        Err(LedgerError::NoActiveDeposit(_))
    ));
    assert!(matches!(
        bed.ledger.withdraw(&acct(0), 9),
        Err(LedgerError::InvariantViolation(_))
    ));

    assert_eq!(bed.ledger.investor(&acct(0)).unwrap(), before);
    assert_eq!(bed.ledger.investor(&acct(1)).unwrap(), DepositRecord::INACTIVE);
    assert_eq!(bed.custody.custody_balance(), custody_before);
    assert_eq!(bed.token.total_supply(), 0);
    bed.ledger.audit().unwrap();
}

// ======================================================================
// E2E Test 5: environment refusals roll back withdrawals
// ======================================================================

#[test]
fn e2e_frozen_custody_then_retry() {
    let mut bed = TestBed::new(10);
    bed.fund(1, MIN);
    bed.ledger.deposit(&acct(0), MIN, 0).unwrap();

    bed.custody.set_frozen(true);
    let err = bed.ledger.withdraw(&acct(0), 500).unwrap_err();
    assert_eq!(err, LedgerError::TransferFailure(TransferError::Frozen));
    assert!(bed.ledger.investor(&acct(0)).unwrap().has_active_deposit);
    bed.ledger.audit().unwrap();

    // Retrying later accrues for the full period since the original deposit.
    bed.custody.set_frozen(false);
    let s = bed.ledger.withdraw(&acct(0), 600).unwrap();
    assert_eq!(s.elapsed_time_units, 600);
    bed.ledger.audit().unwrap();
}

#[test]
fn e2e_capped_token_blocks_settlement_until_zero_interest() {
    let mut bed = TestBed::with_token(10, MemoryRewardToken::with_cap(0));
    bed.fund(1, MIN);
    bed.ledger.deposit(&acct(0), MIN, 0).unwrap();

    let err = bed.ledger.withdraw(&acct(0), 1).unwrap_err();
    assert!(matches!(err, LedgerError::MintFailure(MintError::SupplyCapExceeded { .. })));
    assert_eq!(bed.custody.balance_of(&acct(0)), 0);
    assert_eq!(bed.custody.custody_balance(), MIN);
    bed.ledger.audit().unwrap();

    // Closing within the opening unit accrues nothing, so the mint is a no-op.
    let s = bed.ledger.withdraw(&acct(0), 0).unwrap();
    assert_eq!(s.interest, 0);
    assert_eq!(bed.custody.balance_of(&acct(0)), MIN);
    assert_eq!(bed.token.total_supply(), 0);
}

// ======================================================================
// E2E Test 6: shared ledger across threads
// ======================================================================

#[test]
fn e2e_shared_ledger_conserves_custody() {
    let bed = TestBed::new(50);
    bed.fund(16, 2 * MIN);
    let custody = bed.custody.clone();
    let token = bed.token.clone();
    let shared = SharedLedger::new(bed.ledger);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let ledger = shared.clone();
            std::thread::spawn(move || {
                let who: AccountId = acct(i);
                ledger.deposit(&who, 2 * MIN, i as u64).unwrap();
                if i % 2 == 0 {
                    ledger.withdraw(&who, 1_000).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(shared.total_principal().unwrap(), 8 * 2 * MIN);
    assert_eq!(custody.custody_balance(), 8 * 2 * MIN);
    assert!(token.total_supply() > 0);
    shared.with_ledger(|l| l.audit()).unwrap();
}
