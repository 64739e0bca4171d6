mod common;

use diesel::prelude::*;
use dompet::models::models::TransactionKind;
use dompet::services::ledger_service::LedgerService;
use dompet::ApiError;
use uuid::Uuid;

#[test]
fn credit_updates_balance_and_writes_one_row() {
    let Some(pool) = common::try_pool() else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let conn = &mut pool.get().unwrap();
    let (_, wallet) = common::create_user_with_wallet(conn, "123456", 0);

    let entry = conn
        .transaction(|conn| {
            LedgerService::apply_mutation(
                conn,
                wallet.id,
                50_000,
                TransactionKind::Topup,
                Some("Top up via va - BCA".to_string()),
                None,
            )
        })
        .unwrap();

    assert_eq!(entry.amount, 50_000);
    assert_eq!(entry.kind, "topup");
    assert_eq!(common::wallet_balance(conn, wallet.id), 50_000);
    assert_eq!(common::transaction_count(conn, wallet.id), 1);
}

#[test]
fn overdraft_rejected_without_writes() {
    let Some(pool) = common::try_pool() else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let conn = &mut pool.get().unwrap();
    let (_, wallet) = common::create_user_with_wallet(conn, "123456", 2_000);

    let result = conn.transaction(|conn| {
        LedgerService::apply_mutation(
            conn,
            wallet.id,
            -5_000,
            TransactionKind::TransferOut,
            None,
            None,
        )
    });

    match result {
        Err(ApiError::Rejected { code, .. }) => assert_eq!(code, "insufficient_funds"),
        other => panic!("expected insufficient_funds rejection, got {:?}", other.map(|t| t.id)),
    }
    assert_eq!(common::wallet_balance(conn, wallet.id), 2_000);
    assert_eq!(common::transaction_count(conn, wallet.id), 0);
}

#[test]
fn balance_equals_sum_of_committed_amounts() {
    let Some(pool) = common::try_pool() else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let conn = &mut pool.get().unwrap();
    let (_, wallet) = common::create_user_with_wallet(conn, "123456", 0);

    let deltas: [(i64, TransactionKind); 4] = [
        (100_000, TransactionKind::Topup),
        (-30_000, TransactionKind::TransferOut),
        (25_000, TransactionKind::TransferIn),
        (-40_000, TransactionKind::TransferOut),
    ];

    for (delta, kind) in deltas {
        conn.transaction(|conn| {
            LedgerService::apply_mutation(conn, wallet.id, delta, kind, None, None)
        })
        .unwrap();
    }

    // Also attempt one rejected overdraft; it must not disturb the invariant.
    let _ = conn.transaction(|conn| {
        LedgerService::apply_mutation(
            conn,
            wallet.id,
            -1_000_000,
            TransactionKind::TransferOut,
            None,
            None,
        )
    });

    let balance = common::wallet_balance(conn, wallet.id);
    assert_eq!(balance, 55_000);
    assert_eq!(balance, common::sum_of_amounts(conn, wallet.id));
    assert_eq!(common::transaction_count(conn, wallet.id), 4);
}

/// A debit followed by a failing credit in the same atomic unit must leave
/// no trace of the debit.
#[test]
fn failed_credit_rolls_back_the_debit() {
    let Some(pool) = common::try_pool() else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let conn = &mut pool.get().unwrap();
    let (_, wallet) = common::create_user_with_wallet(conn, "123456", 100_000);

    let result = conn.transaction(|conn| {
        LedgerService::apply_mutation(
            conn,
            wallet.id,
            -30_000,
            TransactionKind::TransferOut,
            None,
            None,
        )?;
        // Credit side targets a wallet that does not exist.
        LedgerService::apply_mutation(
            conn,
            Uuid::new_v4(),
            30_000,
            TransactionKind::TransferIn,
            None,
            None,
        )
    });

    match result {
        Err(ApiError::NotFound { code, .. }) => assert_eq!(code, "unknown_wallet"),
        other => panic!("expected unknown_wallet, got {:?}", other.map(|t| t.id)),
    }
    assert_eq!(common::wallet_balance(conn, wallet.id), 100_000);
    assert_eq!(common::transaction_count(conn, wallet.id), 0);
}

#[test]
fn unknown_wallet_is_not_found() {
    let Some(pool) = common::try_pool() else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let conn = &mut pool.get().unwrap();

    let result = conn.transaction(|conn| {
        LedgerService::apply_mutation(
            conn,
            Uuid::new_v4(),
            1_000,
            TransactionKind::Topup,
            None,
            None,
        )
    });

    match result {
        Err(ApiError::NotFound { code, .. }) => assert_eq!(code, "unknown_wallet"),
        other => panic!("expected unknown_wallet, got {:?}", other.map(|t| t.id)),
    }
}
