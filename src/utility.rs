use crate::services::topup_service::SUPPORTED_BANKS;
use validator::ValidationError;

pub fn validate_bank_code(bank_code: &str) -> Result<(), ValidationError> {
    if SUPPORTED_BANKS.contains(&bank_code) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "Bank code must be one of BCA, BNI, BRI, MANDIRI",
        ))
    }
}
