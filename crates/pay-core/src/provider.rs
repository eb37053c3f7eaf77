//! # Payment Provider Trait
//!
//! Strategy-pattern contract implemented by every gateway.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProvider (trait)                    │
//! │  ├── create_invoice_by_order()                              │
//! │  ├── create_invoice_by_free_amount()                        │
//! │  ├── verify_callback()                                      │
//! │  ├── is_available()                                         │
//! │  └── name()                                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                 ┌──────────┴──────────┐
//!                 │                     │
//!         ┌───────┴───────┐     ┌───────┴───────┐
//!         │ LiqPayProvider│     │WayForPay      │
//!         │               │     │  Provider     │
//!         └───────────────┘     └───────────────┘
//! ```

use crate::callback::CallbackFields;
use crate::error::PaymentResult;
use crate::order::Order;
use async_trait::async_trait;
use std::sync::Arc;

/// Description used when an invoice is not tied to an order
pub const FREE_AMOUNT_DESCRIPTION: &str = "Payment for invoice";

/// Core trait for gateway implementations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider name (for logging and result labelling)
    fn name(&self) -> &'static str;

    /// Whether the provider should be offered at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Create a hosted-checkout URL for an order.
    async fn create_invoice_by_order(&self, order: &dyn Order) -> PaymentResult<String>;

    /// Create a hosted-checkout URL for an arbitrary amount.
    ///
    /// The provider synthesizes its own order reference.
    async fn create_invoice_by_free_amount(
        &self,
        amount: &str,
        currency: &str,
    ) -> PaymentResult<String>;

    /// Check a notification's signature. Never fails, only answers.
    fn verify_callback(&self, fields: &CallbackFields) -> bool;

    /// Callback path for this provider.
    /// Default: `/payment/{name}/callback`
    fn callback_path(&self) -> String {
        format!("/payment/{}/callback", self.name())
    }
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
