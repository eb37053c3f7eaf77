//! # pay-api
//!
//! HTTP API layer for the payment engine.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Invoice endpoints fanning out to every configured gateway
//! - Callback endpoints for LiqPay and WayForPay notifications
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/invoices` | Invoice an order |
//! | POST | `/api/v1/invoices/free-amount` | Invoice an arbitrary amount |
//! | POST | `/payment/liqpay/callback` | LiqPay notification |
//! | POST | `/payment/wayforpay/callback` | WayForPay notification |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
