use crate::{
    auth::AuthUser,
    db::{begin_serializable, DbPool},
    entities::financial_transaction::{self, TransactionType},
    entities::invoice::{
        ActiveModel as InvoiceActiveModel, Entity as InvoiceEntity, InvoicePaymentStatus,
        InvoiceStatus,
    },
    entities::payment::{self, Entity as PaymentEntity, PaymentState},
    errors::ServiceError,
    events::{Event, EventSender},
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::payments::{payment_to_response, PaymentResponse};

/// Input for reversing a completed payment, partially or in full
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RefundPaymentRequest {
    pub reason: Option<String>,
    /// Defaults to the full original payment amount
    pub refund_amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct RefundOutcome {
    pub payment: PaymentResponse,
    pub refund_amount: Decimal,
}

/// Service reversing completed payments and re-deriving invoice aggregates
#[derive(Clone)]
pub struct RefundService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl RefundService {
    /// Creates a new refund service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Reverses a completed payment.
    ///
    /// Runs in one serializable transaction: payment flip, invoice aggregate
    /// rollback and the compensating ledger entry all commit or none do. The
    /// payment becomes inert after any refund, even a partial one; the
    /// unrefunded remainder is tracked only on the invoice.
    #[instrument(skip(self, request), fields(payment_id = %payment_id, caller = %caller.user_id))]
    pub async fn refund_payment(
        &self,
        caller: &AuthUser,
        payment_id: Uuid,
        request: RefundPaymentRequest,
    ) -> Result<RefundOutcome, ServiceError> {
        let db = &*self.db_pool;
        let txn = begin_serializable(db).await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for refund");
            ServiceError::DatabaseError(e)
        })?;

        let p = PaymentEntity::find_by_id(payment_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Payment {} not found", payment_id)))?;

        let inv = InvoiceEntity::find_by_id(p.invoice_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Invoice {} not found", p.invoice_id))
            })?;

        if inv.issued_by != caller.user_id {
            return Err(ServiceError::Forbidden(
                "Only the invoice issuer may refund payments".to_string(),
            ));
        }
        if p.status != PaymentState::Completed {
            return Err(ServiceError::ValidationError(
                "Payment has already been refunded".to_string(),
            ));
        }

        let refund_amount = request.refund_amount.unwrap_or(p.amount);
        if refund_amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Refund amount must be positive".to_string(),
            ));
        }
        if refund_amount > p.amount {
            return Err(ServiceError::ValidationError(format!(
                "Refund amount {} exceeds the original payment amount {}",
                refund_amount, p.amount
            )));
        }

        let now = chrono::Utc::now();
        let reason = request
            .reason
            .clone()
            .unwrap_or_else(|| "No reason given".to_string());

        // Flip the payment and annotate it with the refund details
        let refund_note = format!("Refund: {}", reason);
        let notes = match &p.notes {
            Some(existing) => format!("{}\n{}", existing, refund_note),
            None => refund_note,
        };
        let mut metadata = match &p.metadata {
            Some(serde_json::Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        };
        metadata.insert("refund_date".into(), json!(now.to_rfc3339()));
        metadata.insert("refund_amount".into(), json!(refund_amount.to_string()));
        metadata.insert("refund_reason".into(), json!(reason));
        metadata.insert("refunded_by".into(), json!(caller.user_id.to_string()));

        let payment_currency = p.currency.clone();
        let payer_id = p.payer_id;
        let mut payment_am: payment::ActiveModel = p.into();
        payment_am.status = Set(PaymentState::Refunded);
        payment_am.notes = Set(Some(notes));
        payment_am.metadata = Set(Some(serde_json::Value::Object(metadata)));
        payment_am.updated_at = Set(Some(now));

        let payment_model = payment_am.update(&txn).await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to mark payment refunded");
            ServiceError::DatabaseError(e)
        })?;

        // Roll the invoice aggregates back and re-derive both statuses
        let amount_paid = inv.amount_paid - refund_amount;
        let amount_due = inv.total_amount - amount_paid;

        let (payment_status, status, paid_date) = if amount_due <= Decimal::ZERO {
            (InvoicePaymentStatus::Paid, InvoiceStatus::Paid, inv.paid_date)
        } else if amount_paid > Decimal::ZERO {
            (InvoicePaymentStatus::Partial, InvoiceStatus::Sent, None)
        } else {
            (
                InvoicePaymentStatus::Refunded,
                InvoiceStatus::Refunded,
                None,
            )
        };

        let issued_by = inv.issued_by;
        let invoice_id = inv.id;
        let invoice_number = inv.invoice_number.clone();

        let mut invoice_am: InvoiceActiveModel = inv.into();
        invoice_am.amount_paid = Set(amount_paid);
        invoice_am.amount_due = Set(amount_due);
        invoice_am.payment_status = Set(payment_status);
        invoice_am.status = Set(status);
        invoice_am.paid_date = Set(paid_date);
        invoice_am.updated_at = Set(Some(now));

        invoice_am.update(&txn).await.map_err(|e| {
            error!(error = %e, invoice_id = %invoice_id, "Failed to update invoice aggregates for refund");
            ServiceError::DatabaseError(e)
        })?;

        // Compensating ledger entry, issuer back to payer
        let ledger_am = financial_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_type: Set(TransactionType::Refund),
            amount: Set(refund_amount),
            currency: Set(payment_currency),
            source_type: Set("payment".to_string()),
            source_id: Set(payment_id),
            from_user_id: Set(issued_by),
            to_user_id: Set(payer_id),
            description: Set(format!("Refund for invoice {}", invoice_number)),
            transaction_date: Set(now),
            status: Set("completed".to_string()),
            created_at: Set(now),
        };
        ledger_am.insert(&txn).await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to insert compensating financial transaction");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to commit refund transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(payment_id = %payment_id, invoice_id = %invoice_id,
            refund_amount = %refund_amount, "Payment refunded");

        if let Err(e) = self
            .event_sender
            .send(Event::PaymentRefunded {
                payment_id,
                invoice_id,
                amount: refund_amount,
            })
            .await
        {
            warn!(error = %e, payment_id = %payment_id, "Failed to send payment refunded event");
        }

        Ok(RefundOutcome {
            payment: payment_to_response(payment_model),
            refund_amount,
        })
    }
}
