//! # WayForPay Provider
//!
//! Creates invoices through the offline purchase endpoint, which answers with
//! JSON instead of redirecting.

use crate::client::WayForPayClient;
use crate::config;
use crate::signing::{INVOICE_SIGNATURE_FIELDS, SIGNATURE_FIELD};
use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    CallbackFields, Order, PaymentError, PaymentProvider, PaymentResult, SharedTransport,
    FREE_AMOUNT_DESCRIPTION,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub const PROVIDER_NAME: &str = "wayforpay";

const SECURE_TYPE_AUTO: &str = "AUTO";
const PRODUCT_COUNT: &str = "1";

/// WayForPay hosted checkout
pub struct WayForPayProvider {
    client: WayForPayClient,
}

/// The only part of the offline purchase response we read
#[derive(Debug, Deserialize)]
struct PurchaseResponse {
    #[serde(default)]
    url: Option<String>,
}

impl WayForPayProvider {
    pub fn new(client: WayForPayClient) -> Self {
        Self { client }
    }

    /// Create from environment variables
    pub fn from_env(transport: SharedTransport) -> PaymentResult<Self> {
        let config = config::from_env()?;
        Ok(Self::new(WayForPayClient::new(config, transport)))
    }

    pub fn client(&self) -> &WayForPayClient {
        &self.client
    }

    /// Signed purchase form, signed fields first.
    fn purchase_form(
        &self,
        order_reference: &str,
        amount: &str,
        currency: &str,
        description: &str,
    ) -> Vec<(String, String)> {
        let config = self.client.config();
        let order_date = Utc::now().timestamp().to_string();

        let signed = [
            config.public_key(),
            config.merchant_domain(),
            order_reference,
            order_date.as_str(),
            amount,
            currency,
            description,
            PRODUCT_COUNT,
            amount,
        ];
        let signature = self.client.signer().sign(signed);

        let mut form: Vec<(String, String)> = INVOICE_SIGNATURE_FIELDS
            .iter()
            .zip(signed)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        form.push((SIGNATURE_FIELD.to_string(), signature));
        form.push((
            "merchantTransactionSecureType".to_string(),
            SECURE_TYPE_AUTO.to_string(),
        ));
        form.push(("returnUrl".to_string(), config.redirect_url().to_string()));
        form.push(("serviceUrl".to_string(), config.callback_url().to_string()));
        form
    }

    async fn create_payment(
        &self,
        order_reference: &str,
        form: Vec<(String, String)>,
    ) -> PaymentResult<String> {
        if self.client.config().is_debug() {
            debug!("WayForPay purchase request: {:?}", form);
        }

        let body = self.client.request(&form).await.map_err(|e| match e {
            PaymentError::RequestError(_) => e,
            other => PaymentError::RequestError(other.to_string()),
        })?;

        let url = serde_json::from_str::<PurchaseResponse>(&body)
            .ok()
            .and_then(|r| r.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                warn!("WayForPay response carried no url: {}", body);
                PaymentError::PaymentUrlNotReceived
            })?;

        info!(
            "Created WayForPay invoice: order_reference={}, url={}",
            order_reference, url
        );
        Ok(url)
    }
}

#[async_trait]
impl PaymentProvider for WayForPayProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        self.client.config().has_credentials()
    }

    #[instrument(skip(self, order), fields(order_id = %order.order_id()))]
    async fn create_invoice_by_order(&self, order: &dyn Order) -> PaymentResult<String> {
        let form = self.purchase_form(
            order.order_id(),
            order.amount(),
            order.currency(),
            order.description(),
        );
        self.create_payment(order.order_id(), form).await
    }

    #[instrument(skip(self))]
    async fn create_invoice_by_free_amount(
        &self,
        amount: &str,
        currency: &str,
    ) -> PaymentResult<String> {
        let order_reference = format!("INV-{}", Uuid::new_v4().simple());
        let form = self.purchase_form(&order_reference, amount, currency, FREE_AMOUNT_DESCRIPTION);
        self.create_payment(&order_reference, form).await
    }

    /// Signature over every field value, in the order received.
    ///
    /// The values include `merchantSignature` itself, so a genuine gateway
    /// notification does not pass this check. It differs from
    /// [`crate::WayForPayCallbackHandler`], which signs the fixed list of
    /// eight fields; which of the two the gateway contract intends is an
    /// open question, so both are kept as they are.
    fn verify_callback(&self, fields: &CallbackFields) -> bool {
        let Some(signature) = fields.text(SIGNATURE_FIELD) else {
            return false;
        };

        self.client
            .signer()
            .verify(fields.values_as_text(), &signature)
    }
}
