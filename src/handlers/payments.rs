use crate::auth::{consts as perm, AuthenticatedUser};
use crate::entities::payment::PaymentMethod;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::payments::{PaymentResponse, RecordPaymentRequest};
use crate::services::refunds::RefundPaymentRequest;
use crate::ApiResponse;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "invoice_id": "550e8400-e29b-41d4-a716-446655440000",
    "payment_method": "bank_transfer",
    "amount": "110.00",
    "currency": "USD",
    "notes": "Wire ref 2026-0806"
}))]
pub struct CreatePaymentRequest {
    /// Invoice to pay
    pub invoice_id: Uuid,
    /// Payment method (stripe, paypal, bank_transfer, cash, check, other)
    #[schema(example = "bank_transfer")]
    pub payment_method: String,
    /// Settled amount; must not exceed the invoice amount due
    #[schema(example = "110.00")]
    pub amount: Decimal,
    /// ISO 4217 currency code; must match the invoice currency when present
    pub currency: Option<String>,
    /// Settlement date, defaults to today
    pub payment_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Opaque reference from the payment gateway
    pub gateway_reference: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "reason": "Booking cancelled within the free-cancellation window",
    "refund_amount": "60.00"
}))]
pub struct RefundPaymentHandlerRequest {
    /// Reason recorded on the payment
    pub reason: Option<String>,
    /// Amount to reverse; defaults to the full payment amount
    #[schema(example = "60.00")]
    pub refund_amount: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundResponse {
    pub payment: PaymentResponse,
    pub refund_amount: Decimal,
}

fn parse_payment_method(value: &str) -> Result<PaymentMethod, ServiceError> {
    PaymentMethod::parse(value).ok_or_else(|| {
        ServiceError::ValidationError(format!("Invalid payment method: {}", value))
    })
}

// Handler functions

/// Record a payment against an invoice
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = crate::ApiResponse<PaymentResponse>),
        (status = 400, description = "Already paid or amount exceeds due", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthenticated", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not the billed party", body = crate::errors::ErrorResponse),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ServiceError> {
    if !user.has_permission(perm::BILLING_WRITE) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    request.validate()?;
    if request.amount <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Payment amount must be positive".to_string(),
        ));
    }
    let payment_method = parse_payment_method(&request.payment_method)?;

    let service_request = RecordPaymentRequest {
        invoice_id: request.invoice_id,
        payment_method,
        amount: request.amount,
        currency: request.currency,
        payment_date: request.payment_date,
        notes: request.notes,
        gateway_reference: request.gateway_reference,
    };

    let payment = state
        .services
        .payments
        .record_payment(&user, service_request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            payment,
            "Payment recorded successfully".to_string(),
        )),
    ))
}

/// Get payment by ID
#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_id}",
    params(("payment_id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment details", body = crate::ApiResponse<PaymentResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<PaymentResponse>>, ServiceError> {
    if !user.has_permission(perm::BILLING_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    let payment = state.services.payments.get_payment(&user, payment_id).await?;
    Ok(Json(ApiResponse::success(payment)))
}

/// Refund a completed payment, partially or in full
#[utoipa::path(
    post,
    path = "/api/v1/payments/{payment_id}/refund",
    params(("payment_id" = Uuid, Path, description = "Payment ID")),
    request_body = RefundPaymentHandlerRequest,
    responses(
        (status = 200, description = "Refund processed", body = crate::ApiResponse<RefundResponse>),
        (status = 400, description = "Already refunded or amount exceeds original", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not the invoice issuer", body = crate::errors::ErrorResponse),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn refund_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(request): Json<RefundPaymentHandlerRequest>,
) -> Result<Json<ApiResponse<RefundResponse>>, ServiceError> {
    if !user.has_permission(perm::BILLING_REFUND) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    request.validate()?;

    let service_request = RefundPaymentRequest {
        reason: request.reason,
        refund_amount: request.refund_amount,
    };

    let outcome = state
        .services
        .refunds
        .refund_payment(&user, payment_id, service_request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        RefundResponse {
            payment: outcome.payment,
            refund_amount: outcome.refund_amount,
        },
        "Payment refunded successfully".to_string(),
    )))
}

/// Payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record_payment))
        .route("/:payment_id", get(get_payment))
        .route("/:payment_id/refund", post(refund_payment))
}
