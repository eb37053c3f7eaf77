//! # Provider Configuration
//!
//! Per-gateway credentials and URLs. Built once at startup, from the
//! environment or a config file, then handed to the gateway client.

use crate::error::{PaymentError, PaymentResult};
use serde::Deserialize;
use std::env;
use std::fmt;

/// Immutable configuration for a single gateway
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Public key / merchant account identifier
    public_key: String,

    /// Private key / merchant secret used for signing
    private_key: String,

    /// Merchant domain registered with the gateway
    merchant_domain: String,

    /// Absolute URL the gateway posts notifications to
    callback_url: String,

    /// Absolute URL the customer returns to after checkout
    redirect_url: String,

    /// Log full outgoing payloads
    #[serde(default)]
    debug: bool,
}

impl ProviderConfig {
    /// Create config with explicit values
    pub fn new(
        public_key: impl Into<String>,
        private_key: impl Into<String>,
        merchant_domain: impl Into<String>,
        callback_url: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            merchant_domain: merchant_domain.into(),
            callback_url: callback_url.into(),
            redirect_url: redirect_url.into(),
            debug: false,
        }
    }

    /// Builder: enable payload debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Load configuration from the environment variables named by `vars`.
    ///
    /// Relative callback/redirect paths are prefixed with `APP_URL`.
    /// `APP_DEBUG` toggles the debug flag.
    pub fn from_env(vars: &ProviderEnv) -> PaymentResult<Self> {
        dotenvy::dotenv().ok();

        let public_key = required_var(vars.public_key)?;
        let private_key = required_var(vars.private_key)?;

        let merchant_domain =
            env::var(vars.merchant_domain).unwrap_or_else(|_| DEFAULT_MERCHANT_DOMAIN.to_string());

        let app_url = env::var("APP_URL").unwrap_or_default();
        let callback_url = resolve_url(
            &app_url,
            &env::var(vars.callback_url).unwrap_or_else(|_| vars.default_callback_path.to_string()),
        );
        let redirect_url = resolve_url(
            &app_url,
            &env::var(vars.redirect_url).unwrap_or_else(|_| vars.default_redirect_path.to_string()),
        );

        let debug = env::var("APP_DEBUG")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            public_key,
            private_key,
            merchant_domain,
            callback_url,
            redirect_url,
            debug,
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn merchant_domain(&self) -> &str {
        &self.merchant_domain
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Both keys are present
    pub fn has_credentials(&self) -> bool {
        !self.public_key.trim().is_empty() && !self.private_key.trim().is_empty()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("merchant_domain", &self.merchant_domain)
            .field("callback_url", &self.callback_url)
            .field("redirect_url", &self.redirect_url)
            .field("debug", &self.debug)
            .finish()
    }
}

const DEFAULT_MERCHANT_DOMAIN: &str = "https://your-domain.com";

/// Environment variable names for one gateway
#[derive(Debug, Clone, Copy)]
pub struct ProviderEnv {
    pub public_key: &'static str,
    pub private_key: &'static str,
    pub merchant_domain: &'static str,
    pub callback_url: &'static str,
    pub default_callback_path: &'static str,
    pub redirect_url: &'static str,
    pub default_redirect_path: &'static str,
}

fn required_var(name: &str) -> PaymentResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PaymentError::Configuration(format!("{} not set", name))),
    }
}

/// Join a possibly relative path onto the application base URL
pub fn resolve_url(app_url: &str, path_or_url: &str) -> String {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        return path_or_url.to_string();
    }

    let base = app_url.trim_end_matches('/');
    if path_or_url.starts_with('/') {
        format!("{}{}", base, path_or_url)
    } else {
        format!("{}/{}", base, path_or_url)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
