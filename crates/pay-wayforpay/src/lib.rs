//! # pay-wayforpay
//!
//! WayForPay provider for the payment engine.
//!
//! - **WayForPayProvider** - creates invoices through the offline purchase API
//! - **WayForPayCallbackHandler** - verifies service-url notifications
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_core::ReqwestTransport;
//! use pay_wayforpay::WayForPayProvider;
//!
//! let provider = WayForPayProvider::from_env(ReqwestTransport::new()?.shared())?;
//! let url = provider.create_invoice_by_free_amount("100", "UAH").await?;
//! ```
//!
//! ## Callback Handling
//!
//! ```rust,ignore
//! use pay_core::{CallbackData, CallbackHandler};
//! use pay_wayforpay::WayForPayCallbackHandler;
//!
//! let handler = WayForPayCallbackHandler::from_config(&config);
//! let callback = handler.handle(raw_body.into())?;
//! if callback.is_success() {
//!     // Fulfill the order
//! }
//! ```

pub mod callback;
pub mod client;
pub mod config;
pub mod provider;
pub mod signing;

// Re-exports
pub use callback::{WayForPayCallbackData, WayForPayCallbackHandler};
pub use client::WayForPayClient;
pub use config::{WAYFORPAY_API_BASE_URL, WAYFORPAY_ENV};
pub use provider::{WayForPayProvider, PROVIDER_NAME};
pub use signing::WayForPaySigner;
