use crate::error::ApiError;
use crate::models::models::{NewTransaction, Transaction, TransactionKind, Wallet};
use crate::schema::{transactions, wallets};
use chrono::Utc;
use diesel::prelude::*;
use tracing::{error, info};
use uuid::Uuid;

/// The only code path that changes a wallet balance. Every mutation pairs a
/// balance update with exactly one ledger entry whose signed amount equals
/// the applied delta.
pub struct LedgerService;

impl LedgerService {
    /// Applies a signed balance delta to one wallet and appends the matching
    /// ledger entry.
    ///
    /// Must be called inside an open database transaction: the wallet row is
    /// locked with `SELECT ... FOR UPDATE` and the lock is held until the
    /// caller commits or aborts, so concurrent mutations of the same wallet
    /// serialize instead of reading a stale balance.
    pub fn apply_mutation(
        conn: &mut PgConnection,
        wallet_id: Uuid,
        delta: i64,
        kind: TransactionKind,
        description: Option<String>,
        payment_id: Option<Uuid>,
    ) -> Result<Transaction, ApiError> {
        let wallet = wallets::table
            .find(wallet_id)
            .select(Wallet::as_select())
            .for_update()
            .first::<Wallet>(conn)
            .map_err(|e| {
                if e == diesel::result::Error::NotFound {
                    ApiError::not_found("unknown_wallet", format!("Wallet {} not found", wallet_id))
                } else {
                    error!("Wallet lock failed for {}: {}", wallet_id, e);
                    ApiError::Database(e)
                }
            })?;

        let new_balance = wallet.balance.checked_add(delta).ok_or_else(|| {
            ApiError::Consistency(format!(
                "Balance overflow on wallet {}: {} + {}",
                wallet_id, wallet.balance, delta
            ))
        })?;

        if new_balance < 0 {
            return Err(ApiError::rejected(
                "insufficient_funds",
                format!(
                    "Insufficient balance: available {}, required {}",
                    wallet.balance, -delta
                ),
            ));
        }

        let updated = diesel::update(wallets::table.find(wallet_id))
            .set((
                wallets::balance.eq(new_balance),
                wallets::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .map_err(ApiError::Database)?;

        if updated != 1 {
            return Err(ApiError::Consistency(format!(
                "Balance update for wallet {} touched {} rows",
                wallet_id, updated
            )));
        }

        let entry = diesel::insert_into(transactions::table)
            .values(NewTransaction {
                wallet_id,
                payment_id,
                amount: delta,
                kind: kind.as_str().to_string(),
                description,
            })
            .returning(Transaction::as_returning())
            .get_result(conn)
            .map_err(ApiError::Database)?;

        info!(
            "Ledger mutation applied: wallet={} delta={} kind={} balance={}",
            wallet_id, delta, kind, new_balance
        );

        Ok(entry)
    }

    /// Locks two wallet rows in ascending-id order. Cross-wallet atomic units
    /// (transfers) take their locks through this helper so two simultaneous
    /// opposite-direction transfers cannot deadlock.
    pub fn lock_wallet_pair(
        conn: &mut PgConnection,
        first: Uuid,
        second: Uuid,
    ) -> Result<(), ApiError> {
        let (lo, hi) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };

        for wallet_id in [lo, hi] {
            wallets::table
                .find(wallet_id)
                .select(wallets::id)
                .for_update()
                .first::<Uuid>(conn)
                .map_err(|e| {
                    if e == diesel::result::Error::NotFound {
                        ApiError::not_found(
                            "unknown_wallet",
                            format!("Wallet {} not found", wallet_id),
                        )
                    } else {
                        error!("Wallet lock failed for {}: {}", wallet_id, e);
                        ApiError::Database(e)
                    }
                })?;
        }

        Ok(())
    }
}
