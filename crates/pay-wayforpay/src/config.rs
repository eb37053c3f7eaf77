//! # WayForPay Configuration
//!
//! Environment variable names and endpoints for WayForPay.
//!
//! Required env vars:
//! - `WAYFORPAY_MERCHANT_ACCOUNT`
//! - `WAYFORPAY_MERCHANT_SECRET_KEY`

use pay_core::{PaymentResult, ProviderConfig, ProviderEnv};

/// Production API host
pub const WAYFORPAY_API_BASE_URL: &str = "https://secure.wayforpay.com";

/// Offline purchase endpoint: answers with JSON carrying the checkout URL
pub const WAYFORPAY_PAY_PATH: &str = "/pay?behavior=offline";

/// Environment variables read by [`from_env`]
pub const WAYFORPAY_ENV: ProviderEnv = ProviderEnv {
    public_key: "WAYFORPAY_MERCHANT_ACCOUNT",
    private_key: "WAYFORPAY_MERCHANT_SECRET_KEY",
    merchant_domain: "WAYFORPAY_MERCHANT_DOMAIN",
    callback_url: "WAYFORPAY_CALLBACK_URL",
    default_callback_path: "/payment/wayforpay/callback",
    redirect_url: "WAYFORPAY_REDIRECT_URL",
    default_redirect_path: "/payment/wayforpay/redirect",
};

/// Load WayForPay configuration from environment variables
pub fn from_env() -> PaymentResult<ProviderConfig> {
    ProviderConfig::from_env(&WAYFORPAY_ENV)
}
