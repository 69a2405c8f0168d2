use super::common::PaginationParams;
use crate::auth::{consts as perm, AuthenticatedUser};
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::invoices::{
    CreateInvoiceRequest, InvoiceListFilter, InvoiceResponse, LineItemInput,
    UpdateInvoiceRequest,
};
use crate::entities::invoice::{InvoiceStatus, InvoiceType};
use crate::ApiResponse;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
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
    "invoice_type": "rental",
    "issued_to": "550e8400-e29b-41d4-a716-446655440000",
    "customer_name": "Jamie Chen",
    "customer_email": "jamie@example.com",
    "line_items": [
        {"description": "2 nights at Driftwood Cottage", "quantity": "2", "unit_price": "50.00"}
    ],
    "tax_rate": "10",
    "currency": "USD"
}))]
pub struct CreateInvoiceHandlerRequest {
    /// Invoice type (rental, operational, custom)
    #[schema(example = "rental")]
    pub invoice_type: String,
    /// Party being billed
    pub issued_to: Uuid,
    /// Property this invoice belongs to, if any
    pub property_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "Customer email must be a valid email address"))]
    pub customer_email: String,
    pub customer_address: Option<String>,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub line_items: Vec<LineItemInput>,
    /// Invoice-level tax rate in percent
    pub tax_rate: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    /// Defaults to 30 days after the issue date
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    /// ISO 4217 currency code; defaults to the platform currency
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateInvoiceHandlerRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub tax_rate: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    /// Target status (sent, cancelled); settlement states are derived
    #[schema(example = "sent")]
    pub status: Option<String>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    /// Full replacement for the line-item set; draft invoices only
    pub line_items: Option<Vec<LineItemInput>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct InvoiceListQuery {
    /// Filter by invoice type (rental, operational, custom)
    pub invoice_type: Option<String>,
    /// Filter by status (draft, sent, paid, cancelled, refunded)
    pub status: Option<String>,
    /// Filter by property
    pub property_id: Option<Uuid>,
}

fn parse_invoice_type(value: &str) -> Result<InvoiceType, ServiceError> {
    InvoiceType::parse(value).ok_or_else(|| {
        ServiceError::ValidationError(format!("Invalid invoice type: {}", value))
    })
}

fn parse_invoice_status(value: &str) -> Result<InvoiceStatus, ServiceError> {
    InvoiceStatus::parse(value).ok_or_else(|| {
        ServiceError::ValidationError(format!("Invalid invoice status: {}", value))
    })
}

// Handler functions

/// Create a new invoice with line items
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body = CreateInvoiceHandlerRequest,
    responses(
        (status = 201, description = "Invoice created", body = crate::ApiResponse<InvoiceResponse>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthenticated", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateInvoiceHandlerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<InvoiceResponse>>), ServiceError> {
    if !user.has_permission(perm::BILLING_WRITE) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    request.validate()?;
    let invoice_type = parse_invoice_type(&request.invoice_type)?;

    let service_request = CreateInvoiceRequest {
        invoice_type,
        issued_to: request.issued_to,
        property_id: request.property_id,
        customer_name: request.customer_name,
        customer_email: request.customer_email,
        customer_address: request.customer_address,
        line_items: request.line_items,
        tax_rate: request.tax_rate,
        discount_amount: request.discount_amount,
        due_date: request.due_date,
        notes: request.notes,
        terms: request.terms,
        currency: request.currency,
    };

    let invoice = state
        .services
        .invoices
        .create_invoice(&user, service_request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(invoice))))
}

/// List invoices visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    params(PaginationParams, InvoiceListQuery),
    responses(
        (status = 200, description = "List invoices", body = crate::ApiResponse<crate::PaginatedResponse<InvoiceResponse>>),
        (status = 401, description = "Unauthenticated", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<InvoiceListQuery>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<crate::PaginatedResponse<InvoiceResponse>>>, ServiceError> {
    if !user.has_permission(perm::BILLING_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    let list_filter = InvoiceListFilter {
        invoice_type: match filter.invoice_type.as_deref() {
            Some(value) => Some(parse_invoice_type(value)?),
            None => None,
        },
        status: match filter.status.as_deref() {
            Some(value) => Some(parse_invoice_status(value)?),
            None => None,
        },
        property_id: filter.property_id,
    };

    let page = params.page.max(1);
    let limit = params.per_page.clamp(1, 100);

    let (invoices, total) = state
        .services
        .invoices
        .list_invoices(&user, list_filter, page, limit)
        .await?;

    let response = crate::PaginatedResponse {
        items: invoices,
        total,
        page,
        limit,
        total_pages: total.div_ceil(limit),
    };

    Ok(Json(ApiResponse::success(response)))
}

/// Get a single invoice with its line items
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice detail", body = crate::ApiResponse<InvoiceResponse>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<InvoiceResponse>>, ServiceError> {
    if !user.has_permission(perm::BILLING_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    let invoice = state.services.invoices.get_invoice(&user, id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Update an invoice (draft-only outside of cancellation)
#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = UpdateInvoiceHandlerRequest,
    responses(
        (status = 200, description = "Invoice updated", body = crate::ApiResponse<InvoiceResponse>),
        (status = 400, description = "Invoice not editable", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not the issuer", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateInvoiceHandlerRequest>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, ServiceError> {
    if !user.has_permission(perm::BILLING_WRITE) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    request.validate()?;
    let status = match request.status.as_deref() {
        Some(value) => Some(parse_invoice_status(value)?),
        None => None,
    };

    let service_request = UpdateInvoiceRequest {
        customer_name: request.customer_name,
        customer_email: request.customer_email,
        customer_address: request.customer_address,
        tax_rate: request.tax_rate,
        discount_amount: request.discount_amount,
        due_date: request.due_date,
        status,
        notes: request.notes,
        terms: request.terms,
        line_items: request.line_items,
    };

    let invoice = state
        .services
        .invoices
        .update_invoice(&user, id, service_request)
        .await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Delete a draft invoice
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 400, description = "Invoice is not a draft", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not the issuer", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<StatusCode, ServiceError> {
    if !user.has_permission(perm::BILLING_WRITE) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    state.services.invoices.delete_invoice(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List payments recorded against an invoice
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}/payments",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Payments for invoice", body = crate::ApiResponse<Vec<crate::services::payments::PaymentResponse>>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn get_invoice_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<crate::services::payments::PaymentResponse>>>, ServiceError> {
    if !user.has_permission(perm::BILLING_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    let payments = state
        .services
        .payments
        .list_invoice_payments(&user, id)
        .await?;
    Ok(Json(ApiResponse::success(payments)))
}

/// Invoice routes
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_invoices).post(create_invoice),
        )
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/:id/payments", get(get_invoice_payments))
}
