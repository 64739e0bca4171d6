use crate::error::ApiError;
use crate::models::models::{NewWallet, Transaction, TransactionKind, Wallet};
use crate::schema::{payments, transactions, wallets};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Default)]
pub struct HistoryFilters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub kind: Option<TransactionKind>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One history row: the ledger entry plus the settlement status and
/// reference of the payment it came from, when it was a top-up.
pub type HistoryRow = (Transaction, Option<String>, Option<String>);

/// Read-only projections over the ledger, plus lazy wallet creation. Never
/// mutates a balance; reads observe only committed atomic units.
pub struct WalletService;

impl WalletService {
    /// Returns the user's wallet, creating it with balance 0 on first
    /// access. The insert races safely: on conflict the existing row wins.
    pub fn ensure_wallet(conn: &mut PgConnection, user_id: Uuid) -> Result<Wallet, ApiError> {
        diesel::insert_into(wallets::table)
            .values(NewWallet {
                user_id,
                balance: 0,
            })
            .on_conflict(wallets::user_id)
            .do_nothing()
            .execute(conn)
            .map_err(ApiError::Database)?;

        wallets::table
            .filter(wallets::user_id.eq(user_id))
            .select(Wallet::as_select())
            .first::<Wallet>(conn)
            .map_err(ApiError::Database)
    }

    pub fn get_balance(conn: &mut PgConnection, user_id: Uuid) -> Result<i64, ApiError> {
        Ok(Self::ensure_wallet(conn, user_id)?.balance)
    }

    /// Most recent ledger entries for the dashboard card.
    pub fn recent_activity(
        conn: &mut PgConnection,
        wallet_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Transaction>, ApiError> {
        transactions::table
            .filter(transactions::wallet_id.eq(wallet_id))
            .order(transactions::created_at.desc())
            .limit(limit)
            .select(Transaction::as_select())
            .load::<Transaction>(conn)
            .map_err(ApiError::Database)
    }

    /// Paginated, filtered history, newest first. Top-up rows carry the
    /// payment status and external id through the payment foreign key.
    pub fn get_history(
        conn: &mut PgConnection,
        user_id: Uuid,
        filters: &HistoryFilters,
    ) -> Result<Vec<HistoryRow>, ApiError> {
        let wallet = Self::ensure_wallet(conn, user_id)?;

        let mut query = transactions::table
            .left_join(payments::table)
            .filter(transactions::wallet_id.eq(wallet.id))
            .into_boxed();

        if let Some(start) = filters.start_date {
            query = query.filter(transactions::created_at.ge(start));
        }
        if let Some(end) = filters.end_date {
            query = query.filter(transactions::created_at.le(end));
        }
        if let Some(kind) = filters.kind {
            query = query.filter(transactions::kind.eq(kind.as_str()));
        }
        if let Some(term) = filters.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term);
            query = query.filter(
                transactions::description
                    .ilike(pattern.clone())
                    .or(transactions::kind.ilike(pattern)),
            );
        }

        let limit = filters
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let offset = filters.offset.unwrap_or(0).max(0);

        query
            .order(transactions::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select((
                Transaction::as_select(),
                payments::status.nullable(),
                payments::external_id.nullable(),
            ))
            .load::<HistoryRow>(conn)
            .map_err(ApiError::Database)
    }
}
