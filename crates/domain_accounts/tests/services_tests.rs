//! Account Service Tests
//!
//! Exercises the application service against the in-memory repository.
//!
//! # Test Organization
//!
//! - `account_use_cases` - Create, list, show, update, close, open
//! - `transaction_use_cases` - Transaction commands through the service
//! - `ownership` - Accounts are invisible to other users
//! - `concurrency` - Stale writes surface as conflicts
//! - `user_deletion` - The user-deleted event handler

use std::sync::Arc;

use core_kernel::{AccountId, Money, TransactionId, UserId};
use domain_accounts::{
    AccountBalance, AccountRepository, AddTransaction, CreateAccount, DomainEvent, ServiceError,
    TransactionAmount, TransactionDate, TransactionMemo, UpdateAccount, UpdateTransaction,
    UserDeletedHandler,
};
use rust_decimal_macros::dec;
use test_utils::{AccountBuilder, AccountFixtures, InMemoryService, TransactionFixtures};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn create_command(balance: rust_decimal::Decimal) -> CreateAccount {
    CreateAccount {
        name: AccountFixtures::checking_name(),
        initial_balance: AccountBalance::new(Money::new(balance)),
    }
}

fn add_command(amount: rust_decimal::Decimal, cleared: bool) -> AddTransaction {
    AddTransaction {
        amount: TransactionAmount::new(Money::new(amount)),
        date: None,
        memo: None,
        cleared,
    }
}

// ============================================================================
// ACCOUNT USE CASES
// ============================================================================

mod account_use_cases {
    use super::*;

    #[tokio::test]
    async fn test_create_account_persists_with_version() {
        let harness = InMemoryService::new();
        let owner = UserId::new();

        let account = harness
            .service
            .create_account(owner, create_command(dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(account.version(), 1);
        assert_eq!(account.transactions().len(), 1);
        assert_eq!(harness.repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_and_get_return_headers() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let created = harness
            .service
            .create_account(owner, create_command(dec!(5)))
            .await
            .unwrap();

        let listed = harness.service.list_accounts(owner).await.unwrap();
        assert_eq!(listed, vec![created.summary()]);

        let shown = harness.service.get_account(owner, created.id()).await.unwrap();
        assert_eq!(shown.balance, AccountBalance::new(Money::new(dec!(5))));
    }

    #[tokio::test]
    async fn test_update_account_renames_and_appends_correction() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let created = harness
            .service
            .create_account(owner, create_command(dec!(100)))
            .await
            .unwrap();

        let updated = harness
            .service
            .update_account(
                owner,
                created.id(),
                UpdateAccount {
                    name: AccountFixtures::savings_name(),
                    balance: AccountBalance::new(Money::new(dec!(100))),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name().as_str(), "Savings");
        assert_eq!(updated.transactions().len(), 2);
        assert!(updated.transactions()[1].amount().value().is_zero());
        assert_eq!(updated.version(), 2);
    }

    #[tokio::test]
    async fn test_close_and_open_account() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let id = harness
            .service
            .create_account(owner, create_command(dec!(0)))
            .await
            .unwrap()
            .id();

        harness.service.close_account(owner, id).await.unwrap();
        assert!(harness.service.get_account(owner, id).await.unwrap().closed);

        harness.service.open_account(owner, id).await.unwrap();
        assert!(!harness.service.get_account(owner, id).await.unwrap().closed);
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let harness = InMemoryService::new();
        let missing = AccountId::new();

        let error = harness
            .service
            .get_account(UserId::new(), missing)
            .await
            .unwrap_err();

        assert!(matches!(error, ServiceError::AccountNotFound(id) if id == missing));
        assert!(error.is_not_found());
    }
}

// ============================================================================
// TRANSACTION USE CASES
// ============================================================================

mod transaction_use_cases {
    use super::*;

    #[tokio::test]
    async fn test_add_transaction_defaults_date_and_memo() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let id = harness
            .service
            .create_account(owner, create_command(dec!(0)))
            .await
            .unwrap()
            .id();

        let txn = harness
            .service
            .add_transaction(owner, id, add_command(dec!(25), true))
            .await
            .unwrap();

        assert_eq!(txn.date(), TransactionDate::today());
        assert!(txn.memo().is_empty());
        assert_eq!(
            harness.service.get_account(owner, id).await.unwrap().balance,
            AccountBalance::new(Money::new(dec!(25)))
        );
    }

    #[tokio::test]
    async fn test_full_transaction_flow() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let service = &harness.service;
        let id = service
            .create_account(owner, create_command(dec!(1000.00)))
            .await
            .unwrap()
            .id();

        service.add_transaction(owner, id, add_command(dec!(200.00), true)).await.unwrap();
        let pending = service
            .add_transaction(
                owner,
                id,
                AddTransaction {
                    amount: TransactionFixtures::grocery_bill(),
                    date: Some(TransactionFixtures::month_end()),
                    memo: Some(TransactionMemo::new("Groceries")),
                    cleared: false,
                },
            )
            .await
            .unwrap();

        service.clear_transaction(owner, id, pending.id()).await.unwrap();
        assert_eq!(
            service.get_account(owner, id).await.unwrap().balance.value(),
            Money::new(dec!(1150.00))
        );

        service.unclear_transaction(owner, id, pending.id()).await.unwrap();
        service.remove_transaction(owner, id, pending.id()).await.unwrap();

        let transactions = service.list_transactions(owner, id).await.unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(
            service.get_account(owner, id).await.unwrap().balance.value(),
            Money::new(dec!(1200.00))
        );
    }

    #[tokio::test]
    async fn test_update_transaction_applies_delta() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let id = harness
            .service
            .create_account(owner, create_command(dec!(1000)))
            .await
            .unwrap()
            .id();
        let txn = harness
            .service
            .add_transaction(owner, id, add_command(dec!(100), true))
            .await
            .unwrap();

        let updated = harness
            .service
            .update_transaction(
                owner,
                id,
                txn.id(),
                UpdateTransaction {
                    amount: Some(TransactionAmount::new(Money::new(dec!(150)))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id(), txn.id());
        assert_eq!(
            harness.service.get_account(owner, id).await.unwrap().balance.value(),
            Money::new(dec!(1150))
        );
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_not_found_and_not_saved() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let account = harness
            .service
            .create_account(owner, create_command(dec!(10)))
            .await
            .unwrap();

        let error = harness
            .service
            .remove_transaction(owner, account.id(), TransactionId::new())
            .await
            .unwrap_err();
        assert!(error.is_not_found());

        let stored = harness
            .repository
            .find_with_transactions_by_id_and_owner(account.id(), owner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version(), 1);
    }
}

// ============================================================================
// OWNERSHIP
// ============================================================================

mod ownership {
    use super::*;

    #[tokio::test]
    async fn test_other_users_cannot_see_or_mutate() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let account = AccountBuilder::new().with_owner(owner).build();
        let harness = InMemoryService::with_accounts(vec![account.clone()]).await;

        assert!(harness.service.list_accounts(stranger).await.unwrap().is_empty());

        let error = harness
            .service
            .add_transaction(stranger, account.id(), add_command(dec!(1), true))
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::AccountNotFound(_)));
    }
}

// ============================================================================
// CONCURRENCY
// ============================================================================

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn test_stale_save_is_reported_as_conflict() {
        let harness = InMemoryService::new();
        let owner = UserId::new();
        let id = harness
            .service
            .create_account(owner, create_command(dec!(0)))
            .await
            .unwrap()
            .id();

        let stale = harness
            .repository
            .find_with_transactions_by_id_and_owner(id, owner)
            .await
            .unwrap()
            .unwrap();

        harness.service.add_transaction(owner, id, add_command(dec!(1), true)).await.unwrap();

        let error = harness.repository.save(&stale).await.unwrap_err();
        assert!(error.is_conflict());
        assert!(matches!(ServiceError::from(error), ServiceError::Conflict(_)));
    }
}

// ============================================================================
// USER DELETION
// ============================================================================

mod user_deletion {
    use super::*;

    #[tokio::test]
    async fn test_user_deleted_removes_only_their_accounts() {
        let gone = UserId::new();
        let kept = UserId::new();
        let harness = InMemoryService::with_accounts(vec![
            AccountBuilder::new().with_owner(gone).build(),
            AccountBuilder::new().with_owner(gone).with_name("Savings").build(),
            AccountBuilder::new().with_owner(kept).build(),
        ])
        .await;

        let handler = UserDeletedHandler::new(Arc::clone(&harness.service));
        let deleted = handler.handle(&DomainEvent::user_deleted(gone)).await.unwrap();

        assert_eq!(deleted, 2);
        assert!(harness.service.list_accounts(gone).await.unwrap().is_empty());
        assert_eq!(harness.service.list_accounts(kept).await.unwrap().len(), 1);
    }
}
