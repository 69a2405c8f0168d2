use crate::{
    auth::AuthUser,
    db::{begin_serializable, DbPool},
    entities::financial_transaction::{self, TransactionType},
    entities::invoice::{
        ActiveModel as InvoiceActiveModel, Entity as InvoiceEntity, InvoicePaymentStatus,
        InvoiceStatus, Model as InvoiceModel,
    },
    entities::payment::{
        self, Entity as PaymentEntity, Model as PaymentModel, PaymentMethod, PaymentState,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Typed input for recording a settled payment against an invoice
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub invoice_id: Uuid,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub gateway_reference: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: NaiveDate,
    pub status: PaymentState,
    pub payer_id: Uuid,
    pub payer_name: String,
    pub payer_email: String,
    pub gateway_reference: Option<String>,
    pub notes: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn payment_to_response(p: PaymentModel) -> PaymentResponse {
    PaymentResponse {
        id: p.id,
        invoice_id: p.invoice_id,
        payment_method: p.payment_method,
        amount: p.amount,
        currency: p.currency,
        payment_date: p.payment_date,
        status: p.status,
        payer_id: p.payer_id,
        payer_name: p.payer_name,
        payer_email: p.payer_email,
        gateway_reference: p.gateway_reference,
        notes: p.notes,
        metadata: p.metadata,
        created_at: p.created_at,
    }
}

/// Service recording settled payments and keeping invoice aggregates honest
#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PaymentService {
    /// Creates a new payment service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Records a payment against an invoice.
    ///
    /// The whole read-validate-write sequence (invoice load, ceiling check,
    /// payment insert, aggregate update, ledger entry) commits atomically so
    /// concurrent payments cannot both clear the same `amount_due`.
    #[instrument(skip(self, request), fields(invoice_id = %request.invoice_id, caller = %caller.user_id, amount = %request.amount))]
    pub async fn record_payment(
        &self,
        caller: &AuthUser,
        request: RecordPaymentRequest,
    ) -> Result<PaymentResponse, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let txn = begin_serializable(db).await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for payment");
            ServiceError::DatabaseError(e)
        })?;

        let inv = InvoiceEntity::find_by_id(request.invoice_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Invoice {} not found", request.invoice_id))
            })?;

        if inv.issued_to != caller.user_id {
            return Err(ServiceError::Forbidden(
                "Only the billed party may pay this invoice".to_string(),
            ));
        }
        if inv.payment_status == InvoicePaymentStatus::Paid {
            return Err(ServiceError::ValidationError(
                "Invoice is already paid in full".to_string(),
            ));
        }
        if request.amount > inv.amount_due {
            return Err(ServiceError::ValidationError(format!(
                "Payment amount {} exceeds the amount due {}",
                request.amount, inv.amount_due
            )));
        }
        if let Some(currency) = &request.currency {
            if !currency.eq_ignore_ascii_case(&inv.currency) {
                return Err(ServiceError::ValidationError(format!(
                    "Payment currency {} does not match invoice currency {}",
                    currency, inv.currency
                )));
            }
        }

        let now = Utc::now();
        let payment_id = Uuid::new_v4();

        let payment_active_model = payment::ActiveModel {
            id: Set(payment_id),
            invoice_id: Set(inv.id),
            payment_method: Set(request.payment_method),
            amount: Set(request.amount),
            currency: Set(inv.currency.clone()),
            payment_date: Set(request.payment_date.unwrap_or(now.date_naive())),
            status: Set(PaymentState::Completed),
            payer_id: Set(inv.issued_to),
            payer_name: Set(inv.customer_name.clone()),
            payer_email: Set(inv.customer_email.clone()),
            gateway_reference: Set(request.gateway_reference.clone()),
            notes: Set(request.notes.clone()),
            metadata: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let payment_model = payment_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, invoice_id = %inv.id, "Failed to insert payment");
            ServiceError::DatabaseError(e)
        })?;

        // Aggregate roll-forward
        let amount_paid = inv.amount_paid + request.amount;
        let amount_due = inv.total_amount - amount_paid;
        let payment_status = InvoiceModel::derive_payment_status(amount_paid, amount_due);
        let fully_paid = payment_status == InvoicePaymentStatus::Paid;

        let issued_by = inv.issued_by;
        let issued_to = inv.issued_to;
        let invoice_number = inv.invoice_number.clone();
        let currency = inv.currency.clone();

        let mut invoice_am: InvoiceActiveModel = inv.into();
        invoice_am.amount_paid = Set(amount_paid);
        invoice_am.amount_due = Set(amount_due);
        invoice_am.payment_status = Set(payment_status);
        if fully_paid {
            invoice_am.status = Set(InvoiceStatus::Paid);
            invoice_am.paid_date = Set(Some(now.date_naive()));
        }
        invoice_am.updated_at = Set(Some(now));

        invoice_am.update(&txn).await.map_err(|e| {
            error!(error = %e, invoice_id = %request.invoice_id, "Failed to update invoice aggregates");
            ServiceError::DatabaseError(e)
        })?;

        let ledger_am = financial_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_type: Set(TransactionType::Income),
            amount: Set(request.amount),
            currency: Set(currency),
            source_type: Set("payment".to_string()),
            source_id: Set(payment_id),
            from_user_id: Set(issued_to),
            to_user_id: Set(issued_by),
            description: Set(format!("Payment for invoice {}", invoice_number)),
            transaction_date: Set(now),
            status: Set("completed".to_string()),
            created_at: Set(now),
        };
        ledger_am.insert(&txn).await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to insert financial transaction");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to commit payment transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(payment_id = %payment_id, invoice_id = %payment_model.invoice_id,
            amount = %payment_model.amount, fully_paid, "Payment recorded");

        if let Err(e) = self
            .event_sender
            .send(Event::PaymentRecorded {
                payment_id,
                invoice_id: payment_model.invoice_id,
                amount: payment_model.amount,
            })
            .await
        {
            warn!(error = %e, payment_id = %payment_id, "Failed to send payment recorded event");
        }

        Ok(payment_to_response(payment_model))
    }

    /// Retrieves a payment, visible to admins, the payer, and the invoice issuer
    #[instrument(skip(self), fields(payment_id = %payment_id, caller = %caller.user_id))]
    pub async fn get_payment(
        &self,
        caller: &AuthUser,
        payment_id: Uuid,
    ) -> Result<PaymentResponse, ServiceError> {
        let db = &*self.db_pool;

        let p = PaymentEntity::find_by_id(payment_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Payment {} not found", payment_id)))?;

        if !caller.is_admin() && p.payer_id != caller.user_id {
            let issuer = InvoiceEntity::find_by_id(p.invoice_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .map(|inv| inv.issued_by);
            if issuer != Some(caller.user_id) {
                return Err(ServiceError::Forbidden(
                    "You do not have access to this payment".to_string(),
                ));
            }
        }

        Ok(payment_to_response(p))
    }

    /// Lists payments recorded against one invoice, oldest first
    #[instrument(skip(self), fields(invoice_id = %invoice_id, caller = %caller.user_id))]
    pub async fn list_invoice_payments(
        &self,
        caller: &AuthUser,
        invoice_id: Uuid,
    ) -> Result<Vec<PaymentResponse>, ServiceError> {
        let db = &*self.db_pool;

        let inv = InvoiceEntity::find_by_id(invoice_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        if !super::invoice_visible_to(db, caller, &inv).await? {
            return Err(ServiceError::Forbidden(
                "You do not have access to this invoice".to_string(),
            ));
        }

        let payments = PaymentEntity::find()
            .filter(payment::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payment::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(payments.into_iter().map(payment_to_response).collect())
    }
}
