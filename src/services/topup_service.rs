use crate::error::ApiError;
use crate::models::dtos::{TopUpRequest, TopUpResponse};
use crate::models::models::{AppState, NewPayment, Payment, User, PAYMENT_PENDING};
use crate::schema::{payments, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub const MIN_TOPUP: i64 = 10_000;
pub const MAX_TOPUP: i64 = 10_000_000;
pub const SUPPORTED_BANKS: &[&str] = &["BCA", "BNI", "BRI", "MANDIRI"];

struct VirtualAccountDetails {
    provider_reference: Option<String>,
    account_number: Option<String>,
    expiration_date: Option<String>,
}

pub struct TopUpService;

impl TopUpService {
    /// Creates a virtual account at the provider, then records a `pending`
    /// Payment carrying the provider's response. No balance is touched here;
    /// money only moves when the settlement webhook confirms the payment.
    pub async fn initiate_top_up(
        state: Arc<AppState>,
        user_id: Uuid,
        req: TopUpRequest,
    ) -> Result<TopUpResponse, ApiError> {
        let display_name = {
            let conn = &mut state.db.get().map_err(|e| {
                error!("Database connection error: {}", e);
                ApiError::DatabaseConnection(e.to_string())
            })?;

            users::table
                .find(user_id)
                .select(User::as_select())
                .first::<User>(conn)
                .map_err(|e| {
                    if e == diesel::result::Error::NotFound {
                        ApiError::not_found("unknown_user", format!("User {} not found", user_id))
                    } else {
                        ApiError::Database(e)
                    }
                })?
                .name
                .unwrap_or_else(|| "Dompet User".to_string())
        };

        let external_id = format!("topup-{}-{}", user_id, Utc::now().timestamp_millis());

        let va =
            Self::create_virtual_account(&state, &external_id, &req.bank_code, req.amount, &display_name)
                .await?;

        let conn = &mut state.db.get().map_err(|e| {
            error!("Database connection error: {}", e);
            ApiError::DatabaseConnection(e.to_string())
        })?;

        let payment = diesel::insert_into(payments::table)
            .values(NewPayment {
                user_id,
                external_id: external_id.clone(),
                payment_method: "va".to_string(),
                amount: req.amount,
                provider_reference: va.provider_reference,
                virtual_account_number: va.account_number.clone(),
                bank_code: Some(req.bank_code.clone()),
                status: PAYMENT_PENDING.to_string(),
            })
            .returning(Payment::as_returning())
            .get_result::<Payment>(conn)
            .map_err(ApiError::Database)?;

        info!(
            "Top-up initiated: user={} external_id={} amount={} bank={}",
            user_id, external_id, req.amount, req.bank_code
        );

        Ok(TopUpResponse {
            payment_id: payment.id,
            external_id,
            virtual_account_number: va.account_number,
            bank_code: req.bank_code,
            amount: req.amount,
            expiration_date: va.expiration_date,
        })
    }

    async fn create_virtual_account(
        state: &AppState,
        external_id: &str,
        bank_code: &str,
        amount: i64,
        name: &str,
    ) -> Result<VirtualAccountDetails, ApiError> {
        let client = Client::new();

        let resp = client
            .post(format!("{}/callback_virtual_accounts", state.va_api_url))
            .basic_auth(&state.va_secret_key, Some(""))
            .json(&serde_json::json!({
                "external_id": external_id,
                "bank_code": bank_code,
                "name": name,
                "amount": amount,
                "is_single_use": true,
                "expiration_date": (Utc::now() + Duration::hours(24)).to_rfc3339(),
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Virtual account request failed: {}", e);
                ApiError::Provider(format!("Virtual account request failed: {}", e))
            })?;

        let status = resp.status();
        let json = resp.json::<serde_json::Value>().await.map_err(|e| {
            error!("Virtual account response parsing failed: {}", e);
            ApiError::Provider(format!("Invalid provider response: {}", e))
        })?;

        if !status.is_success() {
            error!(
                "Virtual account creation failed: status {}, response {:?}",
                status, json
            );
            return Err(ApiError::Provider(format!(
                "Virtual account creation failed: {}",
                json["message"].as_str().unwrap_or("unknown error")
            )));
        }

        Ok(VirtualAccountDetails {
            provider_reference: json["id"].as_str().map(str::to_string),
            account_number: json["account_number"].as_str().map(str::to_string),
            expiration_date: json["expiration_date"].as_str().map(str::to_string),
        })
    }
}
