//! Account DTOs
//!
//! Request bodies are checked in two steps: `validator` enforces field
//! lengths, then `into_command` builds the domain value objects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Money;
use domain_accounts::{
    Account, AccountBalance, AccountName, AccountSummary, AddTransaction, CreateAccount,
    Transaction, TransactionAmount, TransactionDate, TransactionMemo, UpdateAccount,
    UpdateTransaction,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub initial_balance: Decimal,
}

impl CreateAccountRequest {
    pub fn into_command(self) -> Result<CreateAccount, ApiError> {
        self.validate()?;
        if self.initial_balance < Decimal::ZERO {
            return Err(ApiError::Validation(
                "initial_balance must not be negative".to_string(),
            ));
        }

        Ok(CreateAccount {
            name: AccountName::new(self.name)?,
            initial_balance: AccountBalance::new(Money::try_new(self.initial_balance)?),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub balance: Decimal,
}

impl UpdateAccountRequest {
    pub fn into_command(self) -> Result<UpdateAccount, ApiError> {
        self.validate()?;

        Ok(UpdateAccount {
            name: AccountName::new(self.name)?,
            balance: AccountBalance::new(Money::try_new(self.balance)?),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddTransactionRequest {
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub memo: Option<String>,
    #[serde(default)]
    pub cleared: bool,
}

impl AddTransactionRequest {
    pub fn into_command(self) -> Result<AddTransaction, ApiError> {
        self.validate()?;

        Ok(AddTransaction {
            amount: TransactionAmount::new(Money::try_new(self.amount)?),
            date: self.date.map(TransactionDate::new),
            memo: self.memo.map(TransactionMemo::new),
            cleared: self.cleared,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTransactionRequest {
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub memo: Option<String>,
}

impl UpdateTransactionRequest {
    pub fn into_command(self) -> Result<UpdateTransaction, ApiError> {
        self.validate()?;

        Ok(UpdateTransaction {
            amount: self
                .amount
                .map(|a| Money::try_new(a).map(TransactionAmount::new))
                .transpose()?,
            date: self.date.map(TransactionDate::new),
            memo: self.memo.map(TransactionMemo::new),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub balance: Decimal,
    pub closed: bool,
    /// Sum of pending transactions; only present when the ledger was loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncleared: Option<Decimal>,
}

impl From<&AccountSummary> for AccountResponse {
    fn from(summary: &AccountSummary) -> Self {
        Self {
            id: *summary.id.as_uuid(),
            name: summary.name.to_string(),
            balance: summary.balance.value().amount(),
            closed: summary.closed,
            uncleared: None,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            uncleared: account.uncleared_total().ok().map(|m| m.amount()),
            ..Self::from(&account.summary())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub total: usize,
    pub accounts: Vec<AccountResponse>,
}

impl From<Vec<AccountSummary>> for AccountListResponse {
    fn from(summaries: Vec<AccountSummary>) -> Self {
        let accounts: Vec<_> = summaries.iter().map(AccountResponse::from).collect();
        Self {
            total: accounts.len(),
            accounts,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub date_of_transaction: NaiveDate,
    pub memo: String,
    pub cleared: bool,
}

impl From<&Transaction> for TransactionResponse {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: *transaction.id().as_uuid(),
            amount: transaction.amount().value().amount(),
            date_of_transaction: transaction.date().value(),
            memo: transaction.memo().to_string(),
            cleared: transaction.is_cleared(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub total: usize,
    pub transactions: Vec<TransactionResponse>,
}

impl From<Vec<Transaction>> for TransactionListResponse {
    fn from(transactions: Vec<Transaction>) -> Self {
        let transactions: Vec<_> = transactions.iter().map(TransactionResponse::from).collect();
        Self {
            total: transactions.len(),
            transactions,
        }
    }
}
