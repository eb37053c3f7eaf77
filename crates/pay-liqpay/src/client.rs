//! # LiqPay Client
//!
//! Posts a signed checkout request and extracts the hosted-checkout URL.
//! LiqPay answers the POST with a redirect to the checkout page; the first
//! redirect hop is the URL handed to the customer.

use crate::config::{LIQPAY_API_BASE_URL, LIQPAY_CHECKOUT_PATH};
use crate::signing::LiqPaySigner;
use pay_core::{PaymentError, PaymentResult, ProviderConfig, SharedTransport};
use tracing::{debug, error, instrument};

/// Encoded payload plus its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// `base64(JSON(payload))`
    pub data: String,
    pub signature: String,
}

impl SignedPayload {
    pub fn new(data: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            signature: signature.into(),
        }
    }

    /// Both parts are present
    pub fn is_complete(&self) -> bool {
        !self.data.is_empty() && !self.signature.is_empty()
    }
}

/// Transport-level LiqPay client
pub struct LiqPayClient {
    config: ProviderConfig,
    signer: LiqPaySigner,
    transport: SharedTransport,
    api_base_url: String,
}

impl LiqPayClient {
    pub fn new(config: ProviderConfig, transport: SharedTransport) -> Self {
        let signer = LiqPaySigner::new(config.private_key());
        Self {
            config,
            signer,
            transport,
            api_base_url: LIQPAY_API_BASE_URL.to_string(),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn signer(&self) -> &LiqPaySigner {
        &self.signer
    }

    /// Signature over an encoded `data` string
    pub fn generate_signature(&self, data: &str) -> String {
        self.signer.sign(data)
    }

    pub fn checkout_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            LIQPAY_CHECKOUT_PATH
        )
    }

    /// Send the payload and return the checkout URL.
    ///
    /// Succeeds only on status 200 with at least one redirect hop.
    #[instrument(skip(self, payload))]
    pub async fn request(&self, payload: &SignedPayload) -> PaymentResult<String> {
        if !payload.is_complete() {
            return Err(PaymentError::InvalidSignature);
        }

        let fields = vec![
            ("data".to_string(), payload.data.clone()),
            ("signature".to_string(), payload.signature.clone()),
        ];

        let response = self
            .transport
            .post_form(&self.checkout_url(), &fields, true)
            .await?;

        if !response.is_ok() {
            error!(
                "LiqPay API error: status={}, body={}",
                response.status, response.body
            );
            return Err(PaymentError::RequestError(response.body));
        }

        debug!("LiqPay redirect history: {:?}", response.redirect_history);

        response
            .redirect_history
            .into_iter()
            .next()
            .ok_or(PaymentError::PaymentUrlNotReceived)
    }
}
