use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI document for the billing API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rentora Billing API",
        description = "Invoices, payments, refunds and the financial ledger of the Rentora rental platform",
        license(name = "MIT")
    ),
    paths(
        crate::handlers::invoices::create_invoice,
        crate::handlers::invoices::list_invoices,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::update_invoice,
        crate::handlers::invoices::delete_invoice,
        crate::handlers::invoices::get_invoice_payments,
        crate::handlers::payments::record_payment,
        crate::handlers::payments::get_payment,
        crate::handlers::payments::refund_payment,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::invoices::CreateInvoiceHandlerRequest,
        crate::handlers::invoices::UpdateInvoiceHandlerRequest,
        crate::handlers::payments::CreatePaymentRequest,
        crate::handlers::payments::RefundPaymentHandlerRequest,
        crate::handlers::payments::RefundResponse,
        crate::services::invoices::LineItemInput,
        crate::services::invoices::LineItemResponse,
        crate::services::invoices::InvoiceResponse,
        crate::services::payments::PaymentResponse,
        crate::entities::invoice::InvoiceType,
        crate::entities::invoice::InvoiceStatus,
        crate::entities::invoice::InvoicePaymentStatus,
        crate::entities::payment::PaymentMethod,
        crate::entities::payment::PaymentState,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Invoices", description = "Invoice lifecycle and line items"),
        (name = "Payments", description = "Payment recording and refunds")
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme referenced by the path annotations
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).expect("document should serialize");
        assert!(json.contains("/api/v1/invoices"));
        assert!(json.contains("/api/v1/payments"));
    }
}
