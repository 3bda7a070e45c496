//! Property tests for ledger accounting invariants.
//!
//! For any sequence of credits and debits, the wallet balance must equal
//! the welcome grant plus the sum of every accepted adjustment, must never
//! go negative, and every entry's running total must chain correctly.

use std::sync::Arc;

use proptest::prelude::*;

use audiowall::adapters::memory::InMemoryLedgerStore;
use audiowall::application::handlers::wallet::{AdjustBalanceCommand, AdjustBalanceHandler};
use audiowall::domain::foundation::UserId;
use audiowall::domain::ledger::{EntryDraft, EntryKind, LedgerError};
use audiowall::ports::LedgerStore;

fn adjustment() -> impl Strategy<Value = i64> {
    // Mix of credits and debits, deliberately larger than the welcome
    // grant so overdraw rejections happen often.
    -120i64..=120
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn balance_is_the_sum_of_accepted_adjustments(
        welcome in 0i64..=100,
        amounts in proptest::collection::vec(adjustment(), 0..40),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async move {
            let ledger = Arc::new(InMemoryLedgerStore::new());
            let user_id = UserId::new();
            ledger
                .create_wallet(
                    user_id,
                    EntryDraft::new(EntryKind::Welcome, welcome, "Welcome bonus coins"),
                )
                .await
                .unwrap();

            let handler = AdjustBalanceHandler::new(ledger.clone() as Arc<dyn LedgerStore>);
            let mut expected = welcome;

            for amount in amounts {
                let result = handler
                    .handle(AdjustBalanceCommand {
                        user_id,
                        amount,
                        reason: "prop".to_string(),
                    })
                    .await;

                match result {
                    Ok(balance) => {
                        expected += amount;
                        prop_assert_eq!(balance, expected);
                    }
                    Err(LedgerError::InsufficientFunds { .. }) => {
                        // Overdraw rejected; nothing changed.
                        prop_assert!(expected + amount < 0);
                    }
                    Err(other) => return Err(TestCaseError::fail(format!("unexpected: {other}"))),
                }

                prop_assert!(expected >= 0);
            }

            let balance = ledger.read_balance(user_id).await.unwrap();
            prop_assert_eq!(balance, expected);

            // Entry amounts reconcile to the balance and the running totals
            // chain without gaps.
            let entries = ledger.ledger_entries(user_id).await.unwrap();
            let sum: i64 = entries.iter().map(|e| e.amount).sum();
            prop_assert_eq!(sum, balance);

            let mut running = 0;
            for entry in &entries {
                running += entry.amount;
                prop_assert_eq!(entry.balance_after, running);
                prop_assert!(entry.balance_after >= 0);
            }

            Ok(())
        })?;
    }
}
