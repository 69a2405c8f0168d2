pub mod common;
pub mod invoices;
pub mod payments;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub invoices: Arc<crate::services::invoices::InvoiceService>,
    pub payments: Arc<crate::services::payments::PaymentService>,
    pub refunds: Arc<crate::services::refunds::RefundService>,
}

impl AppServices {
    /// Build the service container shared by all HTTP handlers
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        let invoices = Arc::new(crate::services::invoices::InvoiceService::new(
            db_pool.clone(),
            event_sender.clone(),
            config.default_currency.clone(),
            config.invoice_due_days,
        ));
        let payments = Arc::new(crate::services::payments::PaymentService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let refunds = Arc::new(crate::services::refunds::RefundService::new(
            db_pool,
            event_sender,
        ));

        Self {
            invoices,
            payments,
            refunds,
        }
    }
}
