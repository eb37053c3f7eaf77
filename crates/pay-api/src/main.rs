//! # Payment Server
//!
//! Hosted-checkout invoices for LiqPay and WayForPay.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or provide config/payment.toml)
//! export APP_URL=https://shop.example
//! export LIQPAY_PUBLIC_KEY=sandbox_...
//! export LIQPAY_PRIVATE_KEY=sandbox_...
//! export WAYFORPAY_MERCHANT_ACCOUNT=test_merch_n1
//! export WAYFORPAY_MERCHANT_SECRET_KEY=...
//!
//! # Run the server
//! payment-server
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment providers: {:?}", state.manager.providers());
    if state.manager.providers().is_empty() {
        warn!("No payment provider configured, invoices will be empty");
    }

    let app = routes::create_router(state);

    info!("Payment server starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Invoices: POST http://{}/api/v1/invoices", addr);
        info!("Callbacks: POST http://{}/payment/{{liqpay,wayforpay}}/callback", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Payment Server
  ━━━━━━━━━━━━━━━━━━━━━━━
  LiqPay + WayForPay hosted checkout
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
