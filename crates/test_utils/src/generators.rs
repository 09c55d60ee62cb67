//! Property-Based Test Generators
//!
//! Proptest strategies for ledger values, plus [`LedgerOp`]: a random
//! operation on an account. Sequences of ops drive the balance invariant
//! property tests.

use chrono::{Duration, NaiveDate};
use core_kernel::{Money, TransactionId};
use domain_accounts::{
    Account, AccountBalance, AccountError, AccountName, TransactionAmount, TransactionDate,
    TransactionMemo,
};
use proptest::prelude::*;

/// Strategy for amounts in minor units, positive or negative
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for Money values (can be negative or zero)
pub fn money_strategy() -> impl Strategy<Value = Money> {
    amount_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for Money values that are zero or positive
pub fn non_negative_money_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000_000i64).prop_map(Money::from_minor)
}

/// Strategy for valid account names
pub fn account_name_strategy() -> impl Strategy<Value = AccountName> {
    "[A-Za-z][A-Za-z0-9 ]{0,30}".prop_map(|s| AccountName::new(s).expect("pattern is never blank"))
}

/// Strategy for dates within a few years of 2024-01-01
pub fn transaction_date_strategy() -> impl Strategy<Value = TransactionDate> {
    (-1000i64..1000i64).prop_map(|offset| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        TransactionDate::new(base + Duration::days(offset))
    })
}

/// Strategy for memos, including the empty memo
pub fn memo_strategy() -> impl Strategy<Value = TransactionMemo> {
    prop_oneof![
        Just(TransactionMemo::empty()),
        "[a-z ]{1,20}".prop_map(TransactionMemo::new),
    ]
}

/// A single random operation on an account
///
/// `target` picks an existing transaction by index (wrapped around the
/// current ledger length). On an empty ledger the op targets an id that
/// does not exist.
#[derive(Debug, Clone)]
pub enum LedgerOp {
    Add {
        amount: Money,
        date: TransactionDate,
        memo: TransactionMemo,
        cleared: bool,
    },
    Update {
        target: usize,
        amount: Option<Money>,
        date: Option<TransactionDate>,
        memo: Option<TransactionMemo>,
    },
    Remove { target: usize },
    Clear { target: usize },
    Unclear { target: usize },
    Rebalance { balance: Money },
    Rename { name: AccountName },
    /// Clears a transaction id that the account does not contain
    ClearUnknown,
}

/// Strategy for a single ledger operation
pub fn ledger_op_strategy() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        3 => (money_strategy(), transaction_date_strategy(), memo_strategy(), any::<bool>())
            .prop_map(|(amount, date, memo, cleared)| LedgerOp::Add { amount, date, memo, cleared }),
        2 => (
            any::<usize>(),
            proptest::option::of(money_strategy()),
            proptest::option::of(transaction_date_strategy()),
            proptest::option::of(memo_strategy()),
        )
            .prop_map(|(target, amount, date, memo)| LedgerOp::Update { target, amount, date, memo }),
        1 => any::<usize>().prop_map(|target| LedgerOp::Remove { target }),
        2 => any::<usize>().prop_map(|target| LedgerOp::Clear { target }),
        2 => any::<usize>().prop_map(|target| LedgerOp::Unclear { target }),
        1 => money_strategy().prop_map(|balance| LedgerOp::Rebalance { balance }),
        1 => account_name_strategy().prop_map(|name| LedgerOp::Rename { name }),
        1 => Just(LedgerOp::ClearUnknown),
    ]
}

/// Strategy for a sequence of up to `max_len` ledger operations
pub fn ledger_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<LedgerOp>> {
    proptest::collection::vec(ledger_op_strategy(), 0..=max_len)
}

/// Applies `op` to `account`
///
/// # Errors
///
/// Whatever the aggregate returns; `ClearUnknown` and ops on an empty ledger
/// yield `AccountError::TransactionNotFound`
pub fn apply_ledger_op(account: &mut Account, op: &LedgerOp) -> Result<(), AccountError> {
    match op {
        LedgerOp::Add { amount, date, memo, cleared } => {
            account.add_transaction(TransactionAmount::new(*amount), *date, memo.clone(), *cleared)?;
        }
        LedgerOp::Update { target, amount, date, memo } => {
            let id = resolve_target(account, *target);
            account.update_transaction(
                id,
                amount.map(TransactionAmount::new),
                *date,
                memo.clone(),
            )?;
        }
        LedgerOp::Remove { target } => {
            account.remove_transaction(resolve_target(account, *target))?;
        }
        LedgerOp::Clear { target } => {
            account.clear_transaction(resolve_target(account, *target))?;
        }
        LedgerOp::Unclear { target } => {
            account.unclear_transaction(resolve_target(account, *target))?;
        }
        LedgerOp::Rebalance { balance } => {
            account.rebalance(AccountBalance::new(*balance))?;
        }
        LedgerOp::Rename { name } => account.rename(name.clone()),
        LedgerOp::ClearUnknown => {
            account.clear_transaction(TransactionId::new())?;
        }
    }
    Ok(())
}

fn resolve_target(account: &Account, target: usize) -> TransactionId {
    let transactions = account.transactions();
    if transactions.is_empty() {
        TransactionId::new()
    } else {
        transactions[target % transactions.len()].id()
    }
}
