//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /api/v1/invoices - Invoice an order with every available provider
/// - POST /api/v1/invoices/free-amount - Invoice an arbitrary amount
/// - POST /payment/liqpay/callback - LiqPay notification (form body)
/// - POST /payment/wayforpay/callback - WayForPay notification (JSON body)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/invoices", post(handlers::create_invoices))
        .route(
            "/invoices/free-amount",
            post(handlers::create_free_amount_invoice),
        );

    // Gateways post here server-to-server, so no CORS
    let callback_routes = Router::new()
        .route("/liqpay/callback", post(handlers::liqpay_callback))
        .route("/wayforpay/callback", post(handlers::wayforpay_callback));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes.layer(cors))
        .nest("/payment", callback_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
