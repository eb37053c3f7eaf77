//! # pay-liqpay
//!
//! LiqPay provider for the payment engine.
//!
//! - **LiqPayProvider** - creates hosted-checkout invoices
//! - **LiqPayCallbackHandler** - verifies server-to-server notifications
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_core::ReqwestTransport;
//! use pay_liqpay::LiqPayProvider;
//!
//! let provider = LiqPayProvider::from_env(ReqwestTransport::new()?.shared())?;
//! let url = provider.create_invoice_by_free_amount("100", "UAH").await?;
//! ```
//!
//! ## Callback Handling
//!
//! ```rust,ignore
//! use pay_core::{CallbackData, CallbackHandler};
//! use pay_liqpay::LiqPayCallbackHandler;
//!
//! let handler = LiqPayCallbackHandler::from_config(&config);
//! let callback = handler.handle(form_fields.into())?;
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
pub use callback::{LiqPayCallbackData, LiqPayCallbackHandler};
pub use client::{LiqPayClient, SignedPayload};
pub use config::{LIQPAY_API_BASE_URL, LIQPAY_ENV};
pub use provider::{LiqPayProvider, PROVIDER_NAME};
pub use signing::LiqPaySigner;
