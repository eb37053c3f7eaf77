//! # Application State
//!
//! Shared state for the Axum application: the payment manager, the callback
//! handlers of the configured gateways, and server configuration.

use pay_core::{
    BoxedPaymentProvider, PaymentManager, PaymentResult, ProviderConfig, ReqwestTransport,
    SharedTransport,
};
use pay_liqpay::{LiqPayCallbackHandler, LiqPayClient, LiqPayProvider};
use pay_wayforpay::{WayForPayCallbackHandler, WayForPayClient, WayForPayProvider};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, prefixed to relative callback paths
    pub app_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Server configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid socket address {0}")]
    InvalidAddress(String),

    #[error("Failed to parse {path}: {message}")]
    InvalidFile { path: String, message: String },
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            app_url: std::env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Contents of `config/payment.toml`; an absent table falls back to env
#[derive(Debug, Default, Deserialize)]
pub struct PaymentSettings {
    #[serde(default)]
    pub liqpay: Option<ProviderConfig>,
    #[serde(default)]
    pub wayforpay: Option<ProviderConfig>,
}

impl PaymentSettings {
    pub fn from_toml(path: &str, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFile {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registered invoice providers
    pub manager: PaymentManager,
    /// LiqPay notification verifier, if LiqPay is configured
    pub liqpay_callbacks: Option<LiqPayCallbackHandler>,
    /// WayForPay notification verifier, if WayForPay is configured
    pub wayforpay_callbacks: Option<WayForPayCallbackHandler>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment and `config/payment.toml`
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let settings = load_payment_settings()?;
        let transport = ReqwestTransport::new()?.shared();

        let liqpay = settings
            .liqpay
            .map(Ok)
            .unwrap_or_else(pay_liqpay::config::from_env);
        let wayforpay = settings
            .wayforpay
            .map(Ok)
            .unwrap_or_else(pay_wayforpay::config::from_env);

        Ok(Self::with_gateways(config, liqpay, wayforpay, transport))
    }

    /// Register every gateway whose configuration loaded; skip the rest.
    pub fn with_gateways(
        config: AppConfig,
        liqpay: PaymentResult<ProviderConfig>,
        wayforpay: PaymentResult<ProviderConfig>,
        transport: SharedTransport,
    ) -> Self {
        let mut manager = PaymentManager::default();
        let mut liqpay_callbacks = None;
        let mut wayforpay_callbacks = None;

        match liqpay {
            Ok(gateway) => {
                liqpay_callbacks = Some(LiqPayCallbackHandler::from_config(&gateway));
                let client = LiqPayClient::new(gateway, transport.clone());
                manager.register(Arc::new(LiqPayProvider::new(client)) as BoxedPaymentProvider);
            }
            Err(e) => warn!("LiqPay disabled: {}", e),
        }

        match wayforpay {
            Ok(gateway) => {
                wayforpay_callbacks = Some(WayForPayCallbackHandler::from_config(&gateway));
                let client = WayForPayClient::new(gateway, transport);
                manager.register(Arc::new(WayForPayProvider::new(client)) as BoxedPaymentProvider);
            }
            Err(e) => warn!("WayForPay disabled: {}", e),
        }

        Self::from_parts(config, manager, liqpay_callbacks, wayforpay_callbacks)
    }

    pub fn from_parts(
        config: AppConfig,
        manager: PaymentManager,
        liqpay_callbacks: Option<LiqPayCallbackHandler>,
        wayforpay_callbacks: Option<WayForPayCallbackHandler>,
    ) -> Self {
        Self {
            manager,
            liqpay_callbacks,
            wayforpay_callbacks,
            config,
        }
    }
}

/// Load provider configuration from config file, if there is one
fn load_payment_settings() -> anyhow::Result<PaymentSettings> {
    let config_paths = [
        "config/payment.toml",
        "../config/payment.toml",
        "../../config/payment.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let settings = PaymentSettings::from_toml(path, &content)?;
            info!("Loaded payment settings from {}", path);
            return Ok(settings);
        }
    }

    info!("No payment settings file found, using environment");
    Ok(PaymentSettings::default())
}
