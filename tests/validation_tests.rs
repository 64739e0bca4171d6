use dompet::models::dtos::{TopUpRequest, TransferRequest, VirtualAccountWebhook};
use dompet::models::models::TransactionKind;
use dompet::utility::validate_bank_code;
use dompet::ApiError;
use http::StatusCode;
use serde_json::json;
use validator::Validate;

#[test]
fn top_up_request_bounds() {
    let req = serde_json::from_value::<TopUpRequest>(json!({
        "amount": 10_000,
        "bank_code": "BCA"
    }))
    .unwrap();
    assert!(req.validate().is_ok());

    // Below minimum
    let req = serde_json::from_value::<TopUpRequest>(json!({
        "amount": 9_999,
        "bank_code": "BCA"
    }))
    .unwrap();
    assert!(req.validate().is_err());

    // Above maximum
    let req = serde_json::from_value::<TopUpRequest>(json!({
        "amount": 10_000_001,
        "bank_code": "BCA"
    }))
    .unwrap();
    assert!(req.validate().is_err());

    // Unknown bank
    let req = serde_json::from_value::<TopUpRequest>(json!({
        "amount": 50_000,
        "bank_code": "XYZ"
    }))
    .unwrap();
    assert!(req.validate().is_err());
}

#[test]
fn bank_code_validator_accepts_supported_banks() {
    for bank in ["BCA", "BNI", "BRI", "MANDIRI"] {
        assert!(validate_bank_code(bank).is_ok(), "{} should be valid", bank);
    }
    assert!(validate_bank_code("bca").is_err());
    assert!(validate_bank_code("").is_err());
}

#[test]
fn transfer_request_validation() {
    let req = serde_json::from_value::<TransferRequest>(json!({
        "recipient_email": "friend@example.com",
        "amount": 30_000,
        "description": "lunch",
        "pin": "123456"
    }))
    .unwrap();
    assert!(req.validate().is_ok());

    // Invalid email
    let req = serde_json::from_value::<TransferRequest>(json!({
        "recipient_email": "not-an-email",
        "amount": 30_000,
        "description": "lunch",
        "pin": "123456"
    }))
    .unwrap();
    assert!(req.validate().is_err());

    // PIN must be exactly six characters
    let req = serde_json::from_value::<TransferRequest>(json!({
        "recipient_email": "friend@example.com",
        "amount": 30_000,
        "description": "lunch",
        "pin": "1234"
    }))
    .unwrap();
    assert!(req.validate().is_err());
}

#[test]
fn transaction_kind_round_trips() {
    for kind in [
        TransactionKind::Topup,
        TransactionKind::TransferOut,
        TransactionKind::TransferIn,
    ] {
        assert_eq!(TransactionKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(TransactionKind::parse("withdrawal"), None);
    assert_eq!(TransactionKind::parse(""), None);
}

#[test]
fn webhook_payload_deserializes_provider_format() {
    let payload = serde_json::from_value::<VirtualAccountWebhook>(json!({
        "id": "579c8d61f23fa4ca35e52da4",
        "external_id": "topup-5fb1cfd1-1625097600000",
        "account_number": "8808999956275653",
        "bank_code": "BCA",
        "amount": 50_000,
        "transaction_timestamp": "2026-08-29T10:00:00.000Z",
        "payment_id": "5f218745736e619164dc8608"
    }))
    .unwrap();

    assert_eq!(payload.external_id, "topup-5fb1cfd1-1625097600000");
    assert_eq!(payload.amount, 50_000);
    assert_eq!(payload.payment_id.as_deref(), Some("5f218745736e619164dc8608"));
}

#[test]
fn rejection_codes_map_to_stable_bodies() {
    let cases = [
        (
            ApiError::rejected("insufficient_funds", "Insufficient balance"),
            StatusCode::BAD_REQUEST,
            "insufficient_funds",
        ),
        (
            ApiError::rejected("bad_auth", "Incorrect transaction PIN"),
            StatusCode::BAD_REQUEST,
            "bad_auth",
        ),
        (
            ApiError::not_found("unknown_payment", "No payment found"),
            StatusCode::NOT_FOUND,
            "unknown_payment",
        ),
        (
            ApiError::conflict("payment_not_pending", "Payment is expired"),
            StatusCode::CONFLICT,
            "payment_not_pending",
        ),
        (
            ApiError::Auth("Invalid callback token".to_string()),
            StatusCode::UNAUTHORIZED,
            "unauthorized",
        ),
    ];

    for (error, expected_status, expected_code) in cases {
        let (status, body) = error.status_and_body();
        assert_eq!(status, expected_status);
        assert_eq!(body.error, expected_code);
        assert!(!body.message.is_empty());
    }
}

#[test]
fn internal_errors_do_not_leak_detail() {
    let error = ApiError::Consistency(
        "No wallet for user 42 while settling payment topup-42-1".to_string(),
    );
    let (status, body) = error.status_and_body();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "internal_error");
    assert!(!body.message.contains("wallet"));
    assert!(!body.message.contains("topup-42-1"));
}
