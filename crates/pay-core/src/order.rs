//! # Order Types
//!
//! The caller-side order contract and the per-provider invoice result.

use serde::{Deserialize, Serialize};

/// An order a gateway can invoice.
///
/// Amounts are decimal-bearing strings so signed payloads never go through
/// floating point.
pub trait Order: Send + Sync {
    /// Merchant-side order identifier
    fn order_id(&self) -> &str;

    /// Amount as a decimal string, e.g. `"100.50"`
    fn amount(&self) -> &str;

    /// ISO 4217 currency code, e.g. `"UAH"`
    fn currency(&self) -> &str;

    /// Human-readable description shown on the checkout page
    fn description(&self) -> &str;
}

/// Plain order value, used by the HTTP layer and in tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order_id: String,
    pub amount: String,
    pub currency: String,
    pub description: String,
}

impl OrderDetails {
    pub fn new(
        order_id: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            amount: amount.into(),
            currency: currency.into(),
            description: description.into(),
        }
    }
}

impl Order for OrderDetails {
    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn amount(&self) -> &str {
        &self.amount
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// A hosted-checkout URL produced by one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceResult {
    /// Provider name (e.g., "liqpay", "wayforpay")
    pub provider: String,

    /// URL to redirect the customer to
    pub payment_url: String,
}

impl InvoiceResult {
    pub fn new(provider: impl Into<String>, payment_url: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            payment_url: payment_url.into(),
        }
    }
}
