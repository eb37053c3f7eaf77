//! # pay-core
//!
//! Core contracts for hosted-checkout payment gateways.
//!
//! This crate provides:
//! - `PaymentProvider` trait implemented by each gateway
//! - `PaymentManager` to fan an invoice request out to every provider
//! - `CallbackHandler` / `CallbackData` for authenticated notifications
//! - `ProviderConfig` for per-gateway credentials
//! - `HttpTransport` with a `reqwest`-backed default
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{OrderDetails, PaymentManager};
//!
//! let manager = PaymentManager::default()
//!     .with_provider(liqpay)
//!     .with_provider(wayforpay);
//!
//! let order = OrderDetails::new("ORDER-1", "100.00", "UAH", "Vehicle report");
//! for invoice in manager.create_payment_data(&order).await {
//!     println!("{} -> {}", invoice.provider, invoice.payment_url);
//! }
//! ```

pub mod callback;
pub mod config;
pub mod error;
pub mod manager;
pub mod order;
pub mod provider;
pub mod signature;
pub mod transport;

// Re-exports for convenience
pub use callback::{value_to_text, CallbackData, CallbackFields, CallbackHandler, CallbackPayload};
pub use config::{ProviderConfig, ProviderEnv};
pub use error::{PaymentError, PaymentResult};
pub use manager::PaymentManager;
pub use order::{InvoiceResult, Order, OrderDetails};
pub use provider::{BoxedPaymentProvider, PaymentProvider, FREE_AMOUNT_DESCRIPTION};
pub use signature::{constant_time_compare, constant_time_eq};
pub use transport::{HttpTransport, ReqwestTransport, SharedTransport, TransportResponse};
