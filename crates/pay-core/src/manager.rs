//! # Payment Manager
//!
//! Fans one invoice request out to every registered provider and collects the
//! checkout URLs that came back. A provider that is unavailable or fails is
//! left out of the result; the others are unaffected.

use crate::error::PaymentResult;
use crate::order::{InvoiceResult, Order};
use crate::provider::{BoxedPaymentProvider, PaymentProvider};
use tracing::{info, instrument, warn};

/// Ordered set of providers
#[derive(Clone, Default)]
pub struct PaymentManager {
    providers: Vec<BoxedPaymentProvider>,
}

impl PaymentManager {
    pub fn new(providers: Vec<BoxedPaymentProvider>) -> Self {
        Self { providers }
    }

    /// Register a provider; results follow registration order
    pub fn register(&mut self, provider: BoxedPaymentProvider) {
        self.providers.push(provider);
    }

    /// Register with builder pattern
    pub fn with_provider(mut self, provider: BoxedPaymentProvider) -> Self {
        self.register(provider);
        self
    }

    /// Names of all registered providers, in registration order
    pub fn providers(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&BoxedPaymentProvider> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// Create an invoice for `order` with every available provider.
    #[instrument(skip(self, order), fields(order_id = %order.order_id()))]
    pub async fn create_payment_data(&self, order: &dyn Order) -> Vec<InvoiceResult> {
        let mut results = Vec::with_capacity(self.providers.len());

        for provider in self.available() {
            let outcome = provider.create_invoice_by_order(order).await;
            collect(&mut results, provider.as_ref(), outcome);
        }

        info!(
            "Created {} of {} invoices",
            results.len(),
            self.providers.len()
        );
        results
    }

    /// Create a free-amount invoice with every available provider.
    #[instrument(skip(self))]
    pub async fn create_free_amount_invoice(
        &self,
        amount: &str,
        currency: &str,
    ) -> Vec<InvoiceResult> {
        let mut results = Vec::with_capacity(self.providers.len());

        for provider in self.available() {
            let outcome = provider
                .create_invoice_by_free_amount(amount, currency)
                .await;
            collect(&mut results, provider.as_ref(), outcome);
        }

        info!(
            "Created {} of {} free-amount invoices",
            results.len(),
            self.providers.len()
        );
        results
    }

    fn available(&self) -> impl Iterator<Item = &BoxedPaymentProvider> {
        self.providers.iter().filter(|p| p.is_available())
    }
}

fn collect(
    results: &mut Vec<InvoiceResult>,
    provider: &dyn PaymentProvider,
    outcome: PaymentResult<String>,
) {
    match outcome {
        Ok(url) => results.push(InvoiceResult::new(provider.name(), url)),
        Err(e) => warn!("Skipping provider {}: {}", provider.name(), e),
    }
}
