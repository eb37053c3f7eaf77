//! # LiqPay Callbacks
//!
//! LiqPay posts `data` (base64 JSON) and `signature` form fields. The
//! signature is recomputed over `data` exactly as received.
//!
//! Any failed check, a bad signature included, is reported as
//! [`PaymentError::InvalidCallbackData`]. Undecodable `data` is a
//! [`PaymentError::ParseError`].

use crate::provider::PROVIDER_NAME;
use crate::signing::{decode_data, LiqPaySigner};
use pay_core::{
    CallbackData, CallbackFields, CallbackHandler, CallbackPayload, PaymentError, PaymentResult,
    ProviderConfig,
};
use tracing::{info, instrument, warn};

/// Verifies LiqPay notifications
#[derive(Debug, Clone)]
pub struct LiqPayCallbackHandler {
    signer: LiqPaySigner,
}

impl LiqPayCallbackHandler {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            signer: LiqPaySigner::new(private_key),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.private_key())
    }
}

impl CallbackHandler for LiqPayCallbackHandler {
    type Data = LiqPayCallbackData;

    fn gateway(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self, payload))]
    fn handle(&self, payload: CallbackPayload) -> PaymentResult<LiqPayCallbackData> {
        let fields = payload.into_fields()?;

        let signature = fields
            .text("signature")
            .ok_or(PaymentError::InvalidCallbackData)?;
        let data = fields
            .text("data")
            .filter(|d| !d.is_empty() && d != "0")
            .ok_or(PaymentError::InvalidCallbackData)?;

        let decoded = decode_data(&data)?;

        if !self.signer.verify(&data, &signature) {
            warn!("LiqPay callback signature mismatch");
            return Err(PaymentError::InvalidCallbackData);
        }

        let callback = LiqPayCallbackData::new(decoded);
        info!(
            "Verified LiqPay callback: order_id={:?}, status={:?}",
            callback.order_id(),
            callback.transaction_status()
        );
        Ok(callback)
    }
}

/// Verified LiqPay notification
#[derive(Debug, Clone)]
pub struct LiqPayCallbackData {
    fields: CallbackFields,
}

impl LiqPayCallbackData {
    pub(crate) fn new(fields: CallbackFields) -> Self {
        Self { fields }
    }

    pub fn payment_id(&self) -> Option<i64> {
        self.fields.integer("payment_id")
    }

    pub fn transaction_id(&self) -> Option<String> {
        self.fields.text("transaction_id")
    }

    pub fn currency(&self) -> Option<String> {
        self.fields.text("currency")
    }

    /// Masked card number, e.g. `424242*42`
    pub fn sender_card_mask(&self) -> Option<String> {
        self.fields.text("sender_card_mask2")
    }

    pub fn sender_card_bank(&self) -> Option<String> {
        self.fields.text("sender_card_bank")
    }

    pub fn sender_card_type(&self) -> Option<String> {
        self.fields.text("sender_card_type")
    }

    /// ISO 3166 numeric country code of the card issuer
    pub fn sender_card_country(&self) -> Option<i64> {
        self.fields.integer("sender_card_country")
    }

    pub fn receiver_commission(&self) -> Option<f64> {
        self.fields.decimal("receiver_commission")
    }

    pub fn ip(&self) -> Option<String> {
        self.fields.text("ip")
    }

    pub fn description(&self) -> Option<String> {
        self.fields.text("description")
    }

    pub fn action(&self) -> Option<String> {
        self.fields.text("action")
    }

    pub fn payment_type(&self) -> Option<String> {
        self.fields.text("paytype")
    }

    pub fn language(&self) -> Option<String> {
        self.fields.text("language")
    }

    /// Milliseconds since the epoch
    pub fn create_date(&self) -> Option<i64> {
        self.fields.integer("create_date")
    }

    /// Milliseconds since the epoch
    pub fn end_date(&self) -> Option<i64> {
        self.fields.integer("end_date")
    }

    pub fn raw_data(&self) -> &CallbackFields {
        &self.fields
    }
}

impl CallbackData for LiqPayCallbackData {
    fn is_success(&self) -> bool {
        self.fields.text("status").as_deref() == Some("success")
    }

    fn order_id(&self) -> Option<String> {
        self.fields.text("order_id")
    }

    fn amount(&self) -> Option<String> {
        self.fields.text("amount")
    }

    fn transaction_status(&self) -> Option<String> {
        self.fields.text("status")
    }

    fn fields(&self) -> &CallbackFields {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as b64;
    use base64::Engine;

    const PRIVATE_KEY: &str = "sandbox_private_key";

    const SANDBOX_DATA: &str = "eyJwYXltZW50X2lkIjoyNjYyOTM0MTcxLCJhY3Rpb24iOiJwYXkiLCJzdGF0dXMiOiJzdWNjZXNzIiwidmVyc2lvbiI6MywidHlwZSI6ImJ1eSIsInBheXR5cGUiOiJjYXJkIiwicHVibGljX2tleSI6InNhbmRib3hfaTc1ODEwODE4NzE5IiwiYWNxX2lkIjo0MTQ5NjMsIm9yZGVyX2lkIjoiMTc1MDEwNjIxNiIsImxpcXBheV9vcmRlcl9pZCI6IlpTUElWTzlNMTc1MDEwNjI2Mzc1OTkwMiIsImRlc2NyaXB0aW9uIjoiUGF5bWVudCBmb3IgaW52b2ljZSIsInNlbmRlcl9maXJzdF9uYW1lIjoiVGVzdCIsInNlbmRlcl9sYXN0X25hbWUiOiJUZXN0Iiwic2VuZGVyX2NhcmRfbWFzazIiOiI0MjQyNDIqNDIiLCJzZW5kZXJfY2FyZF9iYW5rIjoiVGVzdCIsInNlbmRlcl9jYXJkX3R5cGUiOiJ2aXNhIiwic2VuZGVyX2NhcmRfY291bnRyeSI6ODA0LCJpcCI6IjMuMTI0LjI2LjE0MyIsImFtb3VudCI6MTAuMCwiY3VycmVuY3kiOiJVU0QiLCJzZW5kZXJfY29tbWlzc2lvbiI6MC4wLCJyZWNlaXZlcl9jb21taXNzaW9uIjowLjE1LCJhZ2VudF9jb21taXNzaW9uIjowLjAsImFtb3VudF9kZWJpdCI6NDE2LjY3LCJhbW91bnRfY3JlZGl0Ijo0MTYuNjcsImNvbW1pc3Npb25fZGViaXQiOjAuMCwiY29tbWlzc2lvbl9jcmVkaXQiOjYuMjUsImN1cnJlbmN5X2RlYml0IjoiVUFIIiwiY3VycmVuY3lfY3JlZGl0IjoiVUFIIiwic2VuZGVyX2JvbnVzIjowLjAsImFtb3VudF9ib251cyI6MC4wLCJtcGlfZWNpIjoiNyIsImlzXzNkcyI6ZmFsc2UsImxhbmd1YWdlIjoidWsiLCJjcmVhdGVfZGF0ZSI6MTc1MDEwNjI2Mzc2MSwiZW5kX2RhdGUiOjE3NTAxMDYyNjM4OTUsInRyYW5zYWN0aW9uX2lkIjoyNjYyOTM0MTcxfQ==";

    const SANDBOX_SIGNATURE: &str = "6Ryr7eOSxO+YeWb/XMQOs4mcLW4=";

    fn payload(data: &str, signature: &str) -> CallbackPayload {
        let fields: CallbackFields = vec![("signature", signature), ("data", data)]
            .into_iter()
            .collect();
        fields.into()
    }

    #[test]
    fn test_supports() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);
        assert!(handler.supports("liqpay"));
        assert!(!handler.supports("wayforpay"));
    }

    #[test]
    fn test_valid_sandbox_callback() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);
        let result = handler
            .handle(payload(SANDBOX_DATA, SANDBOX_SIGNATURE))
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.order_id().as_deref(), Some("1750106216"));
        assert_eq!(result.amount().as_deref(), Some("10"));
        assert_eq!(result.transaction_status().as_deref(), Some("success"));
        assert_eq!(result.payment_id(), Some(2662934171));
        assert_eq!(result.transaction_id().as_deref(), Some("2662934171"));
        assert_eq!(result.currency().as_deref(), Some("USD"));
        assert_eq!(result.sender_card_mask().as_deref(), Some("424242*42"));
        assert_eq!(result.sender_card_bank().as_deref(), Some("Test"));
        assert_eq!(result.sender_card_type().as_deref(), Some("visa"));
        assert_eq!(result.sender_card_country(), Some(804));
        assert_eq!(result.receiver_commission(), Some(0.15));
        assert_eq!(result.ip().as_deref(), Some("3.124.26.143"));
        assert_eq!(result.description().as_deref(), Some("Payment for invoice"));
        assert_eq!(result.action().as_deref(), Some("pay"));
        assert_eq!(result.payment_type().as_deref(), Some("card"));
        assert_eq!(result.language().as_deref(), Some("uk"));
        assert_eq!(result.create_date(), Some(1750106263761));
        assert_eq!(result.end_date(), Some(1750106263895));
    }

    #[test]
    fn test_raw_json_payload() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);
        let raw = serde_json::json!({"data": SANDBOX_DATA, "signature": SANDBOX_SIGNATURE});

        let result = handler.handle(raw.to_string().into()).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_unsuccessful_status_still_verifies() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);
        let data = b64.encode(r#"{"status":"failure","order_id":"42","amount":5}"#);
        let signature = LiqPaySigner::new(PRIVATE_KEY).sign(&data);

        let result = handler.handle(payload(&data, &signature)).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.transaction_status().as_deref(), Some("failure"));
        assert_eq!(result.amount().as_deref(), Some("5"));
    }

    #[test]
    fn test_missing_signature() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);
        let fields: CallbackFields = vec![("data", SANDBOX_DATA)].into_iter().collect();

        let result = handler.handle(fields.into());
        assert!(matches!(result, Err(PaymentError::InvalidCallbackData)));
    }

    #[test]
    fn test_missing_or_falsy_data() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);

        let fields: CallbackFields = vec![("signature", "test_signature")].into_iter().collect();
        assert!(matches!(
            handler.handle(fields.into()),
            Err(PaymentError::InvalidCallbackData)
        ));

        assert!(matches!(
            handler.handle(payload("", "test_signature")),
            Err(PaymentError::InvalidCallbackData)
        ));
        assert!(matches!(
            handler.handle(payload("0", "test_signature")),
            Err(PaymentError::InvalidCallbackData)
        ));
    }

    #[test]
    fn test_signature_mismatch_is_coarse() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);

        let result = handler.handle(payload(SANDBOX_DATA, "invalid_signature"));
        assert!(matches!(result, Err(PaymentError::InvalidCallbackData)));
    }

    #[test]
    fn test_any_signature_character_change_is_rejected() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);

        for i in 0..SANDBOX_SIGNATURE.len() {
            let mut bytes = SANDBOX_SIGNATURE.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let mutated = String::from_utf8(bytes).unwrap();

            let result = handler.handle(payload(SANDBOX_DATA, &mutated));
            assert!(matches!(result, Err(PaymentError::InvalidCallbackData)));
        }
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let handler = LiqPayCallbackHandler::new("another_key");

        let result = handler.handle(payload(SANDBOX_DATA, SANDBOX_SIGNATURE));
        assert!(matches!(result, Err(PaymentError::InvalidCallbackData)));
    }

    #[test]
    fn test_parse_errors() {
        let handler = LiqPayCallbackHandler::new(PRIVATE_KEY);

        let result = handler.handle(payload("invalid_base64_data", "test_signature"));
        assert!(matches!(result, Err(PaymentError::ParseError(_))));

        let result = handler.handle(payload(&b64.encode("invalid json data"), "test_signature"));
        assert!(matches!(result, Err(PaymentError::ParseError(_))));

        let result = handler.handle(CallbackPayload::from("not json at all"));
        assert!(matches!(result, Err(PaymentError::ParseError(_))));
    }
}
