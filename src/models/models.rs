use crate::schema::{payments, transactions, users, wallets};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2;
use diesel::r2d2::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub transfer_pin_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub transfer_pin_hash: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = wallets)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: i64, // integer rupiah, never negative
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = wallets)]
pub struct NewWallet {
    pub user_id: Uuid,
    pub balance: i64,
}

#[derive(Queryable, Selectable, Identifiable, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = transactions)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub amount: i64, // signed: positive = credit, negative = debit
    pub kind: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = transactions)]
pub struct NewTransaction {
    pub wallet_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub amount: i64,
    pub kind: String,
    pub description: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = payments)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub external_id: String,
    pub payment_method: String,
    pub amount: i64,
    pub provider_reference: Option<String>,
    pub virtual_account_number: Option<String>,
    pub bank_code: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub external_id: String,
    pub payment_method: String,
    pub amount: i64,
    pub provider_reference: Option<String>,
    pub virtual_account_number: Option<String>,
    pub bank_code: Option<String>,
    pub status: String,
}

/// Ledger entry kinds. Stored as text in the transactions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Topup,
    TransferOut,
    TransferIn,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Topup => "topup",
            TransactionKind::TransferOut => "transfer_out",
            TransactionKind::TransferIn => "transfer_in",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "topup" => Some(TransactionKind::Topup),
            "transfer_out" => Some(TransactionKind::TransferOut),
            "transfer_in" => Some(TransactionKind::TransferIn),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment lifecycle states. `pending -> paid` is one-way; `failed` and
/// `expired` are terminal with no balance effect.
pub const PAYMENT_PENDING: &str = "pending";
pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_FAILED: &str = "failed";
pub const PAYMENT_EXPIRED: &str = "expired";

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub jwt_secret: String,
    pub webhook_token: String,
    pub va_api_url: String,
    pub va_secret_key: String,
}
