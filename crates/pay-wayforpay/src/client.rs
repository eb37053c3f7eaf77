//! # WayForPay Client
//!
//! Posts the signed purchase form to the offline-behaviour endpoint and
//! returns the raw response body.

use crate::config::{WAYFORPAY_API_BASE_URL, WAYFORPAY_PAY_PATH};
use crate::signing::{WayForPaySigner, SIGNATURE_FIELD};
use pay_core::{PaymentError, PaymentResult, ProviderConfig, SharedTransport};
use tracing::{error, instrument};

/// Transport-level WayForPay client
pub struct WayForPayClient {
    config: ProviderConfig,
    signer: WayForPaySigner,
    transport: SharedTransport,
    api_base_url: String,
}

impl WayForPayClient {
    pub fn new(config: ProviderConfig, transport: SharedTransport) -> Self {
        let signer = WayForPaySigner::new(config.private_key());
        Self {
            config,
            signer,
            transport,
            api_base_url: WAYFORPAY_API_BASE_URL.to_string(),
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

    pub fn signer(&self) -> &WayForPaySigner {
        &self.signer
    }

    pub fn pay_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            WAYFORPAY_PAY_PATH
        )
    }

    /// Send a signed form and return the response body.
    ///
    /// The form must already carry `merchantSignature`.
    #[instrument(skip(self, form), fields(field_count = form.len()))]
    pub async fn request(&self, form: &[(String, String)]) -> PaymentResult<String> {
        if !form.iter().any(|(name, _)| name == SIGNATURE_FIELD) {
            return Err(PaymentError::InvalidSignature);
        }

        let response = self
            .transport
            .post_form(&self.pay_url(), form, false)
            .await?;

        if !response.is_ok() {
            error!(
                "WayForPay API error: status={}, body={}",
                response.status, response.body
            );
            return Err(PaymentError::RequestError(response.body));
        }

        Ok(response.body)
    }
}
