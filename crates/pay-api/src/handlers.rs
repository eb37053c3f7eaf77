//! # Request Handlers
//!
//! Axum request handlers for invoice creation and gateway callbacks.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use pay_core::{
    CallbackData, CallbackFields, CallbackHandler, CallbackPayload, InvoiceResult, OrderDetails,
    PaymentError,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Free-amount invoice request
#[derive(Debug, Deserialize)]
pub struct FreeAmountRequest {
    pub amount: String,
    pub currency: String,
}

/// Verified callback, as acknowledged to the gateway
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CallbackSummary {
    pub provider: String,
    pub order_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
    pub success: bool,
}

impl CallbackSummary {
    fn new(provider: &str, data: &impl CallbackData) -> Self {
        Self {
            provider: provider.to_string(),
            order_id: data.order_id(),
            amount: data.amount(),
            status: data.transaction_status(),
            success: data.is_success(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn not_configured(provider: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(
            ErrorResponse::new("Payment provider not configured", 404).with_details(provider),
        ),
    )
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(payment_error_to_response(PaymentError::InvalidRequest(
            format!("{} is required", field),
        )));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payment-server",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": state.manager.providers(),
    }))
}

/// Create an invoice for an order with every available provider
#[instrument(skip(state, order), fields(order_id = %order.order_id))]
pub async fn create_invoices(
    State(state): State<AppState>,
    Json(order): Json<OrderDetails>,
) -> Result<Json<Vec<InvoiceResult>>, ApiError> {
    require("order_id", &order.order_id)?;
    require("amount", &order.amount)?;
    require("currency", &order.currency)?;

    let invoices = state.manager.create_payment_data(&order).await;
    info!("Returning {} invoices", invoices.len());
    Ok(Json(invoices))
}

/// Create an invoice for an arbitrary amount with every available provider
#[instrument(skip(state))]
pub async fn create_free_amount_invoice(
    State(state): State<AppState>,
    Json(request): Json<FreeAmountRequest>,
) -> Result<Json<Vec<InvoiceResult>>, ApiError> {
    require("amount", &request.amount)?;
    require("currency", &request.currency)?;

    let invoices = state
        .manager
        .create_free_amount_invoice(&request.amount, &request.currency)
        .await;
    Ok(Json(invoices))
}

/// LiqPay server callback (form-encoded `data` + `signature`)
#[instrument(skip(state, form))]
pub async fn liqpay_callback(
    State(state): State<AppState>,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Json<CallbackSummary>, ApiError> {
    let handler = state
        .liqpay_callbacks
        .as_ref()
        .ok_or_else(|| not_configured(pay_liqpay::PROVIDER_NAME))?;

    let fields: CallbackFields = form.into_iter().collect();
    verify(handler, fields.into())
}

/// WayForPay service-url callback (raw JSON body)
#[instrument(skip(state, body))]
pub async fn wayforpay_callback(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<CallbackSummary>, ApiError> {
    let handler = state
        .wayforpay_callbacks
        .as_ref()
        .ok_or_else(|| not_configured(pay_wayforpay::PROVIDER_NAME))?;

    verify(handler, CallbackPayload::Raw(body))
}

fn verify<H: CallbackHandler>(
    handler: &H,
    payload: CallbackPayload,
) -> Result<Json<CallbackSummary>, ApiError> {
    let data = handler.handle(payload).map_err(|e| {
        warn!("Rejected {} callback: {}", handler.gateway(), e);
        payment_error_to_response(e)
    })?;

    let summary = CallbackSummary::new(handler.gateway(), &data);
    info!(
        "Accepted {} callback: order_id={:?}, success={}",
        summary.provider, summary.order_id, summary.success
    );
    Ok(Json(summary))
}
