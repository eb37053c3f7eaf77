//! # LiqPay Configuration
//!
//! Environment variable names and endpoints for LiqPay.
//!
//! Required env vars:
//! - `LIQPAY_PUBLIC_KEY`
//! - `LIQPAY_PRIVATE_KEY`

use pay_core::{PaymentResult, ProviderConfig, ProviderEnv};

/// Production API host
pub const LIQPAY_API_BASE_URL: &str = "https://www.liqpay.ua";

/// Hosted checkout endpoint, relative to the API host
pub const LIQPAY_CHECKOUT_PATH: &str = "/api/3/checkout";

/// Environment variables read by [`from_env`]
pub const LIQPAY_ENV: ProviderEnv = ProviderEnv {
    public_key: "LIQPAY_PUBLIC_KEY",
    private_key: "LIQPAY_PRIVATE_KEY",
    merchant_domain: "LIQPAY_MERCHANT_DOMAIN",
    callback_url: "LIQPAY_CALLBACK_URL",
    default_callback_path: "/payment/liqpay/callback",
    redirect_url: "LIQPAY_REDIRECT_URL",
    default_redirect_path: "/payment/liqpay/redirect",
};

/// Load LiqPay configuration from environment variables
pub fn from_env() -> PaymentResult<ProviderConfig> {
    ProviderConfig::from_env(&LIQPAY_ENV)
}
