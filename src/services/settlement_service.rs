use crate::error::ApiError;
use crate::models::models::{
    Payment, Transaction, TransactionKind, PAYMENT_PAID, PAYMENT_PENDING,
};
use crate::schema::{payments, wallets};
use crate::services::ledger_service::LedgerService;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug)]
pub enum SettlementOutcome {
    /// The payment transitioned to `paid` and the wallet was credited.
    Applied(Transaction),
    /// The payment was already `paid`; nothing happened. Providers deliver
    /// webhooks at least once, so this is the normal duplicate path.
    AlreadyProcessed,
}

pub struct SettlementService;

impl SettlementService {
    /// Consumes one provider confirmation for the payment identified by
    /// `external_id`. The status flip and the wallet credit commit as a
    /// single database transaction; on any failure the payment stays
    /// `pending`.
    pub fn settle(
        conn: &mut PgConnection,
        external_id: &str,
        confirmed_amount: i64,
        provider_timestamp: DateTime<Utc>,
        provider_reference: Option<&str>,
    ) -> Result<SettlementOutcome, ApiError> {
        conn.transaction(|conn| {
            // Lock the payment row so a concurrently delivered duplicate
            // blocks here and then sees status = paid.
            let payment = payments::table
                .filter(payments::external_id.eq(external_id))
                .select(Payment::as_select())
                .for_update()
                .first::<Payment>(conn)
                .optional()
                .map_err(ApiError::Database)?
                .ok_or_else(|| {
                    ApiError::not_found(
                        "unknown_payment",
                        format!("No payment found for external id {}", external_id),
                    )
                })?;

            if payment.status == PAYMENT_PAID {
                info!("Payment {} already processed, ignoring duplicate", external_id);
                return Ok(SettlementOutcome::AlreadyProcessed);
            }

            if payment.status != PAYMENT_PENDING {
                warn!(
                    "Settlement for payment {} in terminal state {}",
                    external_id, payment.status
                );
                return Err(ApiError::conflict(
                    "payment_not_pending",
                    format!("Payment {} is {}", external_id, payment.status),
                ));
            }

            if confirmed_amount != payment.amount {
                warn!(
                    "Amount mismatch for payment {}: confirmed {}, expected {}",
                    external_id, confirmed_amount, payment.amount
                );
                // Left pending for manual review.
                return Err(ApiError::rejected(
                    "amount_mismatch",
                    format!(
                        "Confirmed amount {} does not match expected amount {}",
                        confirmed_amount, payment.amount
                    ),
                ));
            }

            let base_update = diesel::update(payments::table.find(payment.id));
            let updated = match provider_reference {
                Some(reference) => base_update
                    .set((
                        payments::status.eq(PAYMENT_PAID),
                        payments::paid_at.eq(Some(provider_timestamp)),
                        payments::provider_reference.eq(Some(reference.to_string())),
                    ))
                    .execute(conn)
                    .map_err(ApiError::Database)?,
                None => base_update
                    .set((
                        payments::status.eq(PAYMENT_PAID),
                        payments::paid_at.eq(Some(provider_timestamp)),
                    ))
                    .execute(conn)
                    .map_err(ApiError::Database)?,
            };

            if updated != 1 {
                return Err(ApiError::Consistency(format!(
                    "Status update for payment {} touched {} rows",
                    external_id, updated
                )));
            }

            // A paid payment with no wallet to credit would strand the money.
            // Abort the whole unit so the payment stays pending and an
            // operator can reconcile.
            let wallet_id = wallets::table
                .filter(wallets::user_id.eq(payment.user_id))
                .select(wallets::id)
                .first::<Uuid>(conn)
                .optional()
                .map_err(ApiError::Database)?
                .ok_or_else(|| {
                    ApiError::Consistency(format!(
                        "No wallet for user {} while settling payment {}",
                        payment.user_id, external_id
                    ))
                })?;

            let description = match &payment.bank_code {
                Some(bank) => format!("Top up via {} - {}", payment.payment_method, bank),
                None => format!("Top up via {}", payment.payment_method),
            };

            let entry = LedgerService::apply_mutation(
                conn,
                wallet_id,
                payment.amount,
                TransactionKind::Topup,
                Some(description),
                Some(payment.id),
            )?;

            info!(
                "Settlement applied: payment={} wallet={} amount={}",
                external_id, wallet_id, payment.amount
            );

            Ok(SettlementOutcome::Applied(entry))
        })
    }
}
