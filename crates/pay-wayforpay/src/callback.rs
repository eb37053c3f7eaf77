//! # WayForPay Callbacks
//!
//! WayForPay posts a raw JSON object. The signature covers eight fields in a
//! fixed order, not the whole body.
//!
//! The signature field is taken out of the map before verification and is not
//! part of the verified data. A missing signed field is
//! [`PaymentError::InvalidCallbackData`]; a wrong signature is
//! [`PaymentError::InvalidSignature`].

use crate::provider::PROVIDER_NAME;
use crate::signing::{WayForPaySigner, SIGNATURE_FIELD};
use pay_core::{
    value_to_text, CallbackData, CallbackFields, CallbackHandler, CallbackPayload, PaymentError,
    PaymentResult, ProviderConfig,
};
use tracing::{info, instrument, warn};

const STATUS_APPROVED: &str = "Approved";

/// Verifies WayForPay service-url notifications
#[derive(Debug, Clone)]
pub struct WayForPayCallbackHandler {
    signer: WayForPaySigner,
}

impl WayForPayCallbackHandler {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            signer: WayForPaySigner::new(secret),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.private_key())
    }
}

impl CallbackHandler for WayForPayCallbackHandler {
    type Data = WayForPayCallbackData;

    fn gateway(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self, payload))]
    fn handle(&self, payload: CallbackPayload) -> PaymentResult<WayForPayCallbackData> {
        let mut fields = payload.into_fields()?;

        let signature = fields
            .remove(SIGNATURE_FIELD)
            .filter(|value| !value.is_null())
            .map(|value| value_to_text(&value))
            .ok_or(PaymentError::InvalidCallbackData)?;
        let values = WayForPaySigner::callback_values(&fields)?;

        if !self.signer.verify(&values, &signature) {
            warn!("WayForPay callback signature mismatch");
            return Err(PaymentError::InvalidSignature);
        }

        let callback = WayForPayCallbackData::new(fields);
        info!(
            "Verified WayForPay callback: order_reference={:?}, status={:?}",
            callback.order_id(),
            callback.transaction_status()
        );
        Ok(callback)
    }
}

/// Verified WayForPay notification
#[derive(Debug, Clone)]
pub struct WayForPayCallbackData {
    fields: CallbackFields,
}

impl WayForPayCallbackData {
    pub(crate) fn new(fields: CallbackFields) -> Self {
        Self { fields }
    }

    pub fn merchant_account(&self) -> Option<String> {
        self.fields.text("merchantAccount")
    }

    pub fn currency(&self) -> Option<String> {
        self.fields.text("currency")
    }

    pub fn auth_code(&self) -> Option<String> {
        self.fields.text("authCode")
    }

    pub fn email(&self) -> Option<String> {
        self.fields.text("email")
    }

    pub fn phone(&self) -> Option<String> {
        self.fields.text("phone")
    }

    /// Unix seconds
    pub fn created_date(&self) -> Option<i64> {
        self.fields.integer("createdDate")
    }

    /// Unix seconds
    pub fn processing_date(&self) -> Option<i64> {
        self.fields.integer("processingDate")
    }

    pub fn card_pan(&self) -> Option<String> {
        self.fields.text("cardPan")
    }

    pub fn card_type(&self) -> Option<String> {
        self.fields.text("cardType")
    }

    pub fn issuer_bank_country(&self) -> Option<String> {
        self.fields.text("issuerBankCountry")
    }

    pub fn issuer_bank_name(&self) -> Option<String> {
        self.fields.text("issuerBankName")
    }

    /// Card token for recurring charges
    pub fn rec_token(&self) -> Option<String> {
        self.fields.text("recToken")
    }

    pub fn reason(&self) -> Option<String> {
        self.fields.text("reason")
    }

    pub fn reason_code(&self) -> Option<i64> {
        self.fields.integer("reasonCode")
    }

    pub fn fee(&self) -> Option<f64> {
        self.fields.decimal("fee")
    }

    pub fn payment_system(&self) -> Option<String> {
        self.fields.text("paymentSystem")
    }

    pub fn raw_data(&self) -> &CallbackFields {
        &self.fields
    }
}

impl CallbackData for WayForPayCallbackData {
    fn is_success(&self) -> bool {
        self.fields.text("transactionStatus").as_deref() == Some(STATUS_APPROVED)
    }

    fn order_id(&self) -> Option<String> {
        self.fields.text("orderReference")
    }

    fn amount(&self) -> Option<String> {
        self.fields.text("amount")
    }

    fn transaction_status(&self) -> Option<String> {
        self.fields.text("transactionStatus")
    }

    fn fields(&self) -> &CallbackFields {
        &self.fields
    }
}
