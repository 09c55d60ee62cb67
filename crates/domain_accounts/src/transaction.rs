//! Ledger entry owned by an account

use serde::Serialize;

use core_kernel::TransactionId;
use crate::value_objects::{TransactionAmount, TransactionDate, TransactionMemo};

/// A single entry in an account's ledger
///
/// The identifier never changes. Amount, date, memo and the cleared flag are
/// edited only through the owning [`Account`](crate::Account), which keeps
/// the cached balance in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    id: TransactionId,
    amount: TransactionAmount,
    date: TransactionDate,
    memo: TransactionMemo,
    cleared: bool,
}

impl Transaction {
    pub(crate) fn new(
        amount: TransactionAmount,
        date: TransactionDate,
        memo: TransactionMemo,
        cleared: bool,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            amount,
            date,
            memo,
            cleared,
        }
    }

    /// Rebuilds a transaction from persisted state
    ///
    /// Only repositories should call this; the result must be handed to
    /// [`Account::rehydrate`](crate::Account::rehydrate).
    pub fn rehydrate(
        id: TransactionId,
        amount: TransactionAmount,
        date: TransactionDate,
        memo: TransactionMemo,
        cleared: bool,
    ) -> Self {
        Self {
            id,
            amount,
            date,
            memo,
            cleared,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> TransactionAmount {
        self.amount
    }

    pub fn date(&self) -> TransactionDate {
        self.date
    }

    pub fn memo(&self) -> &TransactionMemo {
        &self.memo
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub(crate) fn set_amount(&mut self, amount: TransactionAmount) {
        self.amount = amount;
    }

    pub(crate) fn set_date(&mut self, date: TransactionDate) {
        self.date = date;
    }

    pub(crate) fn set_memo(&mut self, memo: TransactionMemo) {
        self.memo = memo;
    }

    pub(crate) fn clear(&mut self) {
        self.cleared = true;
    }

    pub(crate) fn unclear(&mut self) {
        self.cleared = false;
    }
}
