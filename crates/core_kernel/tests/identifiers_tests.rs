//! Tests for the strongly-typed identifiers

use core_kernel::{AccountId, TransactionId, UserId};
use uuid::Uuid;

mod account_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let first = AccountId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = AccountId::new_v7();
        assert!(first.as_uuid() < second.as_uuid());
    }

    #[test]
    fn test_prefix() {
        assert_eq!(AccountId::prefix(), "ACC");
    }

    #[test]
    fn test_json_serialization_is_bare_uuid() {
        let id = AccountId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));

        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod transaction_id_tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let uuid = Uuid::new_v4();
        let id = TransactionId::from_uuid(uuid);
        assert_eq!(id.to_string(), format!("TXN-{}", uuid));
    }

    #[test]
    fn test_from_str_with_prefix() {
        let id = TransactionId::new();
        let parsed: TransactionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}

mod user_id_tests {
    use super::*;

    #[test]
    fn test_prefix() {
        assert_eq!(UserId::prefix(), "USR");
    }

    #[test]
    fn test_default_is_random() {
        assert_ne!(UserId::default(), UserId::default());
    }
}

mod edge_cases {
    use super::*;

    #[test]
    fn test_invalid_uuid_is_rejected() {
        assert!("ACC-not-a-uuid".parse::<AccountId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_foreign_prefix_is_rejected() {
        let account = AccountId::new();
        assert!(account.to_string().parse::<TransactionId>().is_err());
    }
}
