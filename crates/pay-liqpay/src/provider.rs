//! # LiqPay Provider
//!
//! Builds LiqPay checkout payloads and verifies notifications against the
//! same key material.

use crate::client::{LiqPayClient, SignedPayload};
use crate::config;
use crate::signing::{decode_data, encode_data};
use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    CallbackFields, Order, PaymentError, PaymentProvider, PaymentResult, SharedTransport,
    FREE_AMOUNT_DESCRIPTION,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

pub const PROVIDER_NAME: &str = "liqpay";

const API_VERSION: &str = "3";
const ACTION_PAY: &str = "pay";

/// LiqPay hosted checkout
pub struct LiqPayProvider {
    client: LiqPayClient,
}

impl LiqPayProvider {
    pub fn new(client: LiqPayClient) -> Self {
        Self { client }
    }

    /// Create from environment variables
    pub fn from_env(transport: SharedTransport) -> PaymentResult<Self> {
        let config = config::from_env()?;
        Ok(Self::new(LiqPayClient::new(config, transport)))
    }

    pub fn client(&self) -> &LiqPayClient {
        &self.client
    }

    fn checkout_request<'a>(
        &'a self,
        amount: &'a str,
        currency: &'a str,
        description: &'a str,
        order_id: &'a str,
    ) -> CheckoutRequest<'a> {
        let config = self.client.config();
        CheckoutRequest {
            public_key: config.public_key(),
            version: API_VERSION,
            action: ACTION_PAY,
            amount,
            currency,
            description,
            order_id,
            result_url: config.redirect_url(),
            server_url: config.callback_url(),
        }
    }

    async fn create_payment(&self, request: CheckoutRequest<'_>) -> PaymentResult<String> {
        if self.client.config().is_debug() {
            debug!("LiqPay checkout request: {:?}", request);
        }

        let data = encode_data(&request)?;
        let signature = self.client.generate_signature(&data);

        let url = self
            .client
            .request(&SignedPayload::new(data, signature))
            .await
            .map_err(|e| match e {
                PaymentError::RequestError(_) | PaymentError::PaymentUrlNotReceived => e,
                other => PaymentError::RequestError(other.to_string()),
            })?;

        info!(
            "Created LiqPay invoice: order_id={}, url={}",
            request.order_id, url
        );
        Ok(url)
    }
}

#[async_trait]
impl PaymentProvider for LiqPayProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        self.client.config().has_credentials()
    }

    #[instrument(skip(self, order), fields(order_id = %order.order_id()))]
    async fn create_invoice_by_order(&self, order: &dyn Order) -> PaymentResult<String> {
        let request = self.checkout_request(
            order.amount(),
            order.currency(),
            order.description(),
            order.order_id(),
        );
        self.create_payment(request).await
    }

    #[instrument(skip(self))]
    async fn create_invoice_by_free_amount(
        &self,
        amount: &str,
        currency: &str,
    ) -> PaymentResult<String> {
        let order_id = Utc::now().timestamp().to_string();
        let request = self.checkout_request(amount, currency, FREE_AMOUNT_DESCRIPTION, &order_id);
        self.create_payment(request).await
    }

    fn verify_callback(&self, fields: &CallbackFields) -> bool {
        let (Some(signature), Some(data)) = (fields.text("signature"), fields.text("data")) else {
            return false;
        };

        let Ok(decoded) = decode_data(&data) else {
            return false;
        };

        if decoded.text("status").as_deref() != Some("success") {
            return false;
        }

        self.client.signer().verify(&data, &signature)
    }
}

/// Checkout payload; field order is the order LiqPay receives them in
#[derive(Debug, Serialize)]
struct CheckoutRequest<'a> {
    public_key: &'a str,
    version: &'a str,
    action: &'a str,
    amount: &'a str,
    currency: &'a str,
    description: &'a str,
    order_id: &'a str,
    result_url: &'a str,
    server_url: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{test_config, FakeTransport};
    use crate::signing::LiqPaySigner;
    use base64::engine::general_purpose::STANDARD as b64;
    use base64::Engine;
    use pay_core::{OrderDetails, ProviderConfig, TransportResponse};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn provider(transport: Arc<FakeTransport>) -> LiqPayProvider {
        LiqPayProvider::new(LiqPayClient::new(test_config(), transport))
    }

    fn redirecting() -> Arc<FakeTransport> {
        FakeTransport::new(Ok(TransportResponse::new(200, "")
            .with_redirect_history(["https://www.liqpay.ua/checkout/abc", "https://www.liqpay.ua/checkout/abc/card"])))
    }

    fn posted_data(transport: &FakeTransport) -> (Value, String, String) {
        let posted = transport.posted.lock().unwrap();
        let fields = &posted[0].1;
        let data = fields[0].1.clone();
        let signature = fields[1].1.clone();
        let json = serde_json::from_slice(&b64.decode(&data).unwrap()).unwrap();
        (json, data, signature)
    }

    #[tokio::test]
    async fn test_invoice_by_order_payload() {
        let transport = redirecting();
        let provider = provider(transport.clone());
        let order = OrderDetails::new("ORDER-1", "100.50", "UAH", "Vehicle report");

        let url = provider.create_invoice_by_order(&order).await.unwrap();
        assert_eq!(url, "https://www.liqpay.ua/checkout/abc");

        let (json, data, signature) = posted_data(&transport);
        assert_eq!(
            json,
            json!({
                "public_key": "sandbox_public_key",
                "version": "3",
                "action": "pay",
                "amount": "100.50",
                "currency": "UAH",
                "description": "Vehicle report",
                "order_id": "ORDER-1",
                "result_url": "https://shop.example/payment/liqpay/redirect",
                "server_url": "https://shop.example/payment/liqpay/callback"
            })
        );

        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "public_key", "version", "action", "amount", "currency", "description",
                "order_id", "result_url", "server_url"
            ]
        );

        assert_eq!(signature, LiqPaySigner::new("sandbox_private_key").sign(&data));
    }

    #[tokio::test]
    async fn test_invoice_by_free_amount_payload() {
        let transport = redirecting();
        let provider = provider(transport.clone());

        provider
            .create_invoice_by_free_amount("150", "EUR")
            .await
            .unwrap();

        let (json, _, _) = posted_data(&transport);
        assert_eq!(json["amount"], "150");
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["description"], "Payment for invoice");

        let order_id: i64 = json["order_id"].as_str().unwrap().parse().unwrap();
        assert!(order_id > 1_700_000_000);
    }

    #[tokio::test]
    async fn test_missing_url_is_reported_as_such() {
        let transport = FakeTransport::new(Ok(TransportResponse::new(200, "")));
        let provider = provider(transport);

        let result = provider.create_invoice_by_free_amount("10", "UAH").await;
        assert!(matches!(result, Err(PaymentError::PaymentUrlNotReceived)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_request_error() {
        let transport = FakeTransport::new(Err(PaymentError::RequestError("timeout".into())));
        let provider = provider(transport);

        let result = provider.create_invoice_by_free_amount("10", "UAH").await;
        assert!(matches!(result, Err(PaymentError::RequestError(_))));
    }

    #[test]
    fn test_availability_requires_credentials() {
        let provider = provider(redirecting());
        assert!(provider.is_available());

        let config = ProviderConfig::new("", "", "d", "cb", "rd");
        let provider = LiqPayProvider::new(LiqPayClient::new(config, redirecting()));
        assert!(!provider.is_available());
    }

    fn callback(status: &str) -> CallbackFields {
        let data = b64.encode(json!({"status": status, "order_id": "ORDER-1"}).to_string());
        let signature = LiqPaySigner::new("sandbox_private_key").sign(&data);
        vec![("data", data), ("signature", signature)].into_iter().collect()
    }

    #[test]
    fn test_verify_callback() {
        let provider = provider(redirecting());

        assert!(provider.verify_callback(&callback("success")));
        assert!(!provider.verify_callback(&callback("failure")));
    }

    #[test]
    fn test_verify_callback_rejects_bad_input() {
        let provider = provider(redirecting());

        let mut tampered = callback("success");
        tampered.insert("signature", "AAAA");
        assert!(!provider.verify_callback(&tampered));

        let mut missing = callback("success");
        missing.remove("signature");
        assert!(!provider.verify_callback(&missing));

        let garbage: CallbackFields =
            vec![("data", "not base64!"), ("signature", "x")].into_iter().collect();
        assert!(!provider.verify_callback(&garbage));
    }
}
