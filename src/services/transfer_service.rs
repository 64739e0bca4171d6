use crate::error::ApiError;
use crate::models::models::{Transaction, TransactionKind, User};
use crate::schema::users;
use crate::services::ledger_service::LedgerService;
use crate::services::wallet_service::WalletService;
use diesel::prelude::*;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const MIN_TRANSFER: i64 = 1_000;
pub const MAX_TRANSFER: i64 = 5_000_000;

#[derive(Debug)]
pub struct TransferOutcome {
    pub debit: Transaction,
    pub credit: Transaction,
}

pub struct TransferService;

impl TransferService {
    /// Executes a peer-to-peer transfer. Validation order is fixed: PIN,
    /// recipient, amount bounds, balance. The first failing check wins and
    /// nothing is written. The debit and credit commit as one database
    /// transaction with both wallet rows locked in id order; there is no
    /// reversal path once this returns Ok.
    pub fn transfer(
        conn: &mut PgConnection,
        sender_id: Uuid,
        recipient_email: &str,
        amount: i64,
        description: &str,
        pin: &str,
    ) -> Result<TransferOutcome, ApiError> {
        let sender = users::table
            .find(sender_id)
            .select(User::as_select())
            .first::<User>(conn)
            .map_err(|e| {
                if e == diesel::result::Error::NotFound {
                    ApiError::not_found("unknown_user", format!("User {} not found", sender_id))
                } else {
                    ApiError::Database(e)
                }
            })?;

        // bcrypt::verify is a constant-time comparison of the derived hash.
        let pin_ok = bcrypt::verify(pin, &sender.transfer_pin_hash).map_err(|e| {
            error!("PIN verification failed for user {}: {}", sender_id, e);
            ApiError::Internal("PIN verification failed".to_string())
        })?;
        if !pin_ok {
            warn!("Transfer rejected for user {}: bad PIN", sender_id);
            return Err(ApiError::rejected("bad_auth", "Incorrect transaction PIN"));
        }

        let recipient = users::table
            .filter(users::email.eq(recipient_email))
            .select(User::as_select())
            .first::<User>(conn)
            .optional()
            .map_err(ApiError::Database)?
            .ok_or_else(|| ApiError::rejected("invalid_recipient", "Recipient not found"))?;

        if recipient.id == sender_id {
            return Err(ApiError::rejected(
                "invalid_recipient",
                "Cannot transfer to your own wallet",
            ));
        }

        if !(MIN_TRANSFER..=MAX_TRANSFER).contains(&amount) {
            return Err(ApiError::rejected(
                "amount_out_of_range",
                format!(
                    "Transfer amount must be between {} and {}",
                    MIN_TRANSFER, MAX_TRANSFER
                ),
            ));
        }

        let sender_wallet = WalletService::ensure_wallet(conn, sender_id)?;
        let recipient_wallet = WalletService::ensure_wallet(conn, recipient.id)?;

        // Early rejection on the unlocked balance; re-checked under the row
        // lock inside apply_mutation, which is what makes racing debits safe.
        if sender_wallet.balance < amount {
            return Err(ApiError::rejected(
                "insufficient_funds",
                format!(
                    "Insufficient balance: current balance is {}",
                    sender_wallet.balance
                ),
            ));
        }

        let outcome = conn.transaction(|conn| {
            LedgerService::lock_wallet_pair(conn, sender_wallet.id, recipient_wallet.id)?;

            let debit = LedgerService::apply_mutation(
                conn,
                sender_wallet.id,
                -amount,
                TransactionKind::TransferOut,
                Some(format!("Transfer to {}: {}", recipient.email, description)),
                None,
            )?;

            let credit = LedgerService::apply_mutation(
                conn,
                recipient_wallet.id,
                amount,
                TransactionKind::TransferIn,
                Some(format!("Transfer from {}: {}", sender.email, description)),
                None,
            )?;

            Ok::<TransferOutcome, ApiError>(TransferOutcome { debit, credit })
        })?;

        info!(
            "Transfer completed: {} from {} to {}",
            amount, sender.email, recipient.email
        );

        Ok(outcome)
    }
}
