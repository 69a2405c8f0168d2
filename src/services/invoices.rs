use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::invoice::{
        self, ActiveModel as InvoiceActiveModel, Entity as InvoiceEntity, InvoicePaymentStatus,
        InvoiceStatus, InvoiceType, Model as InvoiceModel,
    },
    entities::invoice_line_item::{
        self, Entity as LineItemEntity, Model as LineItemModel,
    },
    entities::invoice_sequence::{self, Entity as SequenceEntity},
    entities::property,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One line of a create/replace request. Amount columns are derived, never
/// accepted from the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LineItemInput {
    /// Kind of charge (night, cleaning_fee, service, ...)
    pub item_type: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[schema(example = "2")]
    pub quantity: Decimal,
    #[schema(example = "50.00")]
    pub unit_price: Decimal,
    pub tax_rate: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInvoiceRequest {
    pub invoice_type: InvoiceType,
    /// Party being billed
    pub issued_to: Uuid,
    pub property_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "Customer email must be a valid email address"))]
    pub customer_email: String,
    pub customer_address: Option<String>,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub line_items: Vec<LineItemInput>,
    pub tax_rate: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateInvoiceRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub tax_rate: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    /// Full replacement set; existing line items are deleted, never merged
    pub line_items: Option<Vec<LineItemInput>>,
}

impl UpdateInvoiceRequest {
    /// True when the request touches anything besides `status`
    fn has_non_status_changes(&self) -> bool {
        self.customer_name.is_some()
            || self.customer_email.is_some()
            || self.customer_address.is_some()
            || self.tax_rate.is_some()
            || self.discount_amount.is_some()
            || self.due_date.is_some()
            || self.notes.is_some()
            || self.terms.is_some()
            || self.line_items.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceListFilter {
    pub invoice_type: Option<InvoiceType>,
    pub status: Option<InvoiceStatus>,
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LineItemResponse {
    pub id: Uuid,
    pub item_type: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub position: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    pub payment_status: InvoicePaymentStatus,
    pub issued_by: Uuid,
    pub issued_to: Uuid,
    pub property_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: Option<String>,
    pub currency: String,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Populated on single-invoice reads; list responses leave it empty
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub line_items: Vec<LineItemResponse>,
}

/// Computed monetary breakdown for an invoice
struct Totals {
    subtotal: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
}

/// Validate line items and fold them into invoice totals.
///
/// `total = subtotal + tax - discount` and must not go negative.
fn compute_totals(
    items: &[LineItemInput],
    tax_rate: Decimal,
    discount_amount: Decimal,
) -> Result<Totals, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::ValidationError(
            "At least one line item is required".to_string(),
        ));
    }
    if tax_rate < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Tax rate cannot be negative".to_string(),
        ));
    }
    if discount_amount < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Discount amount cannot be negative".to_string(),
        ));
    }

    let mut subtotal = Decimal::ZERO;
    for (idx, item) in items.iter().enumerate() {
        if item.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Line item {}: quantity must be positive",
                idx
            )));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Line item {}: unit price cannot be negative",
                idx
            )));
        }
        subtotal += item.quantity * item.unit_price;
    }

    let tax_amount = subtotal * tax_rate / Decimal::ONE_HUNDRED;
    let total_amount = subtotal + tax_amount - discount_amount;
    if total_amount < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Discount amount exceeds the invoice total".to_string(),
        ));
    }

    Ok(Totals {
        subtotal,
        tax_amount,
        total_amount,
    })
}

/// Service for managing invoices and their line items
#[derive(Clone)]
pub struct InvoiceService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    default_currency: String,
    due_days: i64,
}

impl InvoiceService {
    /// Creates a new invoice service instance
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        default_currency: String,
        due_days: i64,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            default_currency,
            due_days,
        }
    }

    /// Creates a new invoice with its line items in a single transaction
    #[instrument(skip(self, request), fields(issued_by = %caller.user_id, invoice_type = ?request.invoice_type))]
    pub async fn create_invoice(
        &self,
        caller: &AuthUser,
        request: CreateInvoiceRequest,
    ) -> Result<InvoiceResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let tax_rate = request.tax_rate.unwrap_or(Decimal::ZERO);
        let discount_amount = request.discount_amount.unwrap_or(Decimal::ZERO);
        let totals = compute_totals(&request.line_items, tax_rate, discount_amount)?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let today = now.date_naive();
        let invoice_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for invoice creation");
            ServiceError::DatabaseError(e)
        })?;

        let invoice_number = self.next_invoice_number(&txn, request.invoice_type).await;

        let invoice_active_model = InvoiceActiveModel {
            id: Set(invoice_id),
            invoice_number: Set(invoice_number),
            invoice_type: Set(request.invoice_type),
            status: Set(InvoiceStatus::Draft),
            payment_status: Set(InvoicePaymentStatus::Unpaid),
            issued_by: Set(caller.user_id),
            issued_to: Set(request.issued_to),
            property_id: Set(request.property_id),
            customer_name: Set(request.customer_name.clone()),
            customer_email: Set(request.customer_email.clone()),
            customer_address: Set(request.customer_address.clone()),
            currency: Set(request
                .currency
                .clone()
                .unwrap_or_else(|| self.default_currency.clone())),
            subtotal: Set(totals.subtotal),
            tax_rate: Set(tax_rate),
            tax_amount: Set(totals.tax_amount),
            discount_amount: Set(discount_amount),
            total_amount: Set(totals.total_amount),
            amount_paid: Set(Decimal::ZERO),
            amount_due: Set(totals.total_amount),
            issue_date: Set(today),
            due_date: Set(request
                .due_date
                .unwrap_or(today + Duration::days(self.due_days))),
            paid_date: Set(None),
            notes: Set(request.notes.clone()),
            terms: Set(request.terms.clone()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let invoice_model = invoice_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, invoice_id = %invoice_id, "Failed to create invoice in database");
            ServiceError::DatabaseError(e)
        })?;

        let line_items =
            Self::insert_line_items(&txn, invoice_id, &request.line_items, tax_rate).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, invoice_id = %invoice_id, "Failed to commit invoice creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(invoice_id = %invoice_id, invoice_number = %invoice_model.invoice_number, "Invoice created");

        if let Err(e) = self.event_sender.send(Event::InvoiceCreated(invoice_id)).await {
            warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice created event");
        }

        Ok(Self::to_response(invoice_model, line_items))
    }

    /// Retrieves an invoice with its line items, enforcing visibility
    #[instrument(skip(self), fields(invoice_id = %invoice_id, caller = %caller.user_id))]
    pub async fn get_invoice(
        &self,
        caller: &AuthUser,
        invoice_id: Uuid,
    ) -> Result<InvoiceResponse, ServiceError> {
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

        let items = LineItemEntity::find()
            .filter(invoice_line_item::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_line_item::Column::Position)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(Self::to_response(inv, items))
    }

    /// Lists invoices scoped by caller role, with optional filters
    #[instrument(skip(self), fields(caller = %caller.user_id))]
    pub async fn list_invoices(
        &self,
        caller: &AuthUser,
        filter: InvoiceListFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<InvoiceResponse>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut select = InvoiceEntity::find();

        if !caller.is_admin() {
            let mut scope = Condition::any()
                .add(invoice::Column::IssuedBy.eq(caller.user_id))
                .add(invoice::Column::IssuedTo.eq(caller.user_id));

            if caller.is_owner() {
                let owned: Vec<Uuid> = property::Entity::find()
                    .filter(property::Column::OwnerId.eq(caller.user_id))
                    .all(db)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                if !owned.is_empty() {
                    scope = scope.add(invoice::Column::PropertyId.is_in(owned));
                }
            }

            select = select.filter(scope);
        }

        if let Some(invoice_type) = filter.invoice_type {
            select = select.filter(invoice::Column::InvoiceType.eq(invoice_type));
        }
        if let Some(status) = filter.status {
            select = select.filter(invoice::Column::Status.eq(status));
        }
        if let Some(property_id) = filter.property_id {
            select = select.filter(invoice::Column::PropertyId.eq(property_id));
        }

        let paginator = select
            .order_by_desc(invoice::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let invoices = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        let responses = invoices
            .into_iter()
            .map(|inv| Self::to_response(inv, Vec::new()))
            .collect();

        Ok((responses, total))
    }

    /// Updates an invoice. Financial fields and line items are draft-only;
    /// the single exception is cancelling a sent invoice.
    #[instrument(skip(self, request), fields(invoice_id = %invoice_id, caller = %caller.user_id))]
    pub async fn update_invoice(
        &self,
        caller: &AuthUser,
        invoice_id: Uuid,
        request: UpdateInvoiceRequest,
    ) -> Result<InvoiceResponse, ServiceError> {
        let db = &*self.db_pool;

        let inv = InvoiceEntity::find_by_id(invoice_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        if inv.issued_by != caller.user_id {
            return Err(ServiceError::Forbidden(
                "Only the invoice issuer may edit an invoice".to_string(),
            ));
        }

        // Status is never written directly to a derived state
        if let Some(status) = request.status {
            if matches!(status, InvoiceStatus::Paid | InvoiceStatus::Refunded) {
                return Err(ServiceError::ValidationError(
                    "Invoice status cannot be set to a payment-derived state".to_string(),
                ));
            }
        }

        if !inv.is_editable() {
            // Sole exception: a pure cancellation of a sent invoice
            let is_pure_cancel = request.status == Some(InvoiceStatus::Cancelled)
                && !request.has_non_status_changes();
            if !is_pure_cancel {
                return Err(ServiceError::ValidationError(format!(
                    "Invoice in status {:?} is not editable; only cancellation is allowed",
                    inv.status
                )));
            }
            if !inv.is_cancellable() {
                return Err(ServiceError::ValidationError(format!(
                    "Invoice in status {:?} cannot be cancelled",
                    inv.status
                )));
            }

            let mut am: InvoiceActiveModel = inv.into();
            am.status = Set(InvoiceStatus::Cancelled);
            am.updated_at = Set(Some(Utc::now()));
            let updated = am.update(db).await.map_err(ServiceError::DatabaseError)?;

            info!(invoice_id = %invoice_id, "Invoice cancelled");
            if let Err(e) = self
                .event_sender
                .send(Event::InvoiceCancelled(invoice_id))
                .await
            {
                warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice cancelled event");
            }
            return Ok(Self::to_response(updated, Vec::new()));
        }

        // Draft path: recompute totals from the replacement line items, or
        // from the stored subtotal when only rates change.
        let new_tax_rate = request.tax_rate.unwrap_or(inv.tax_rate);
        let new_discount = request.discount_amount.unwrap_or(inv.discount_amount);
        if new_tax_rate < Decimal::ZERO || new_discount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Tax rate and discount amount cannot be negative".to_string(),
            ));
        }

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, invoice_id = %invoice_id, "Failed to start transaction for invoice update");
            ServiceError::DatabaseError(e)
        })?;

        let (subtotal, replaced_items) = match &request.line_items {
            Some(items) => {
                let totals = compute_totals(items, new_tax_rate, new_discount)?;
                LineItemEntity::delete_many()
                    .filter(invoice_line_item::Column::InvoiceId.eq(invoice_id))
                    .exec(&txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                let inserted =
                    Self::insert_line_items(&txn, invoice_id, items, new_tax_rate).await?;
                (totals.subtotal, Some(inserted))
            }
            None => (inv.subtotal, None),
        };

        let tax_amount = subtotal * new_tax_rate / Decimal::ONE_HUNDRED;
        let total_amount = subtotal + tax_amount - new_discount;
        if total_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Discount amount exceeds the invoice total".to_string(),
            ));
        }
        let amount_paid = inv.amount_paid;
        let amount_due = total_amount - amount_paid;

        let status = request.status.unwrap_or(inv.status);
        let mut am: InvoiceActiveModel = inv.into();
        if let Some(name) = request.customer_name.clone() {
            am.customer_name = Set(name);
        }
        if let Some(email) = request.customer_email.clone() {
            am.customer_email = Set(email);
        }
        if let Some(address) = request.customer_address.clone() {
            am.customer_address = Set(Some(address));
        }
        if let Some(due_date) = request.due_date {
            am.due_date = Set(due_date);
        }
        if let Some(notes) = request.notes.clone() {
            am.notes = Set(Some(notes));
        }
        if let Some(terms) = request.terms.clone() {
            am.terms = Set(Some(terms));
        }
        am.tax_rate = Set(new_tax_rate);
        am.discount_amount = Set(new_discount);
        am.subtotal = Set(subtotal);
        am.tax_amount = Set(tax_amount);
        am.total_amount = Set(total_amount);
        am.amount_due = Set(amount_due);
        am.payment_status = Set(InvoiceModel::derive_payment_status(amount_paid, amount_due));
        am.status = Set(status);
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&txn).await.map_err(|e| {
            error!(error = %e, invoice_id = %invoice_id, "Failed to update invoice");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, invoice_id = %invoice_id, "Failed to commit invoice update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(invoice_id = %invoice_id, status = ?updated.status, "Invoice updated");

        let event = if updated.status == InvoiceStatus::Cancelled {
            Event::InvoiceCancelled(invoice_id)
        } else {
            Event::InvoiceUpdated(invoice_id)
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice updated event");
        }

        let items = match replaced_items {
            Some(items) => items,
            None => {
                LineItemEntity::find()
                    .filter(invoice_line_item::Column::InvoiceId.eq(invoice_id))
                    .order_by_asc(invoice_line_item::Column::Position)
                    .all(db)
                    .await
                    .map_err(ServiceError::DatabaseError)?
            }
        };

        Ok(Self::to_response(updated, items))
    }

    /// Deletes a draft invoice and its line items. Non-draft invoices must be
    /// cancelled instead.
    #[instrument(skip(self), fields(invoice_id = %invoice_id, caller = %caller.user_id))]
    pub async fn delete_invoice(
        &self,
        caller: &AuthUser,
        invoice_id: Uuid,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let inv = InvoiceEntity::find_by_id(invoice_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        if inv.issued_by != caller.user_id {
            return Err(ServiceError::Forbidden(
                "Only the invoice issuer may delete an invoice".to_string(),
            ));
        }
        if inv.status != InvoiceStatus::Draft {
            return Err(ServiceError::ValidationError(
                "Only draft invoices can be deleted; cancel the invoice instead".to_string(),
            ));
        }

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;
        LineItemEntity::delete_many()
            .filter(invoice_line_item::Column::InvoiceId.eq(invoice_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        InvoiceEntity::delete_by_id(invoice_id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(invoice_id = %invoice_id, "Invoice deleted");
        if let Err(e) = self
            .event_sender
            .send(Event::InvoiceDeleted(invoice_id))
            .await
        {
            warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice deleted event");
        }

        Ok(())
    }

    /// Next human-facing invoice number for the given type.
    ///
    /// The per-type sequence row is authoritative and is bumped inside the
    /// caller's transaction. A failure to read or bump it degrades to a
    /// timestamp-derived number; the unique constraint on `invoice_number`
    /// still guards against an actual collision.
    async fn next_invoice_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice_type: InvoiceType,
    ) -> String {
        let prefix = invoice_type.number_prefix();

        match Self::bump_sequence(conn, invoice_type).await {
            Ok(value) => format!("{}-{:06}", prefix, value),
            Err(e) => {
                warn!(error = %e, invoice_type = invoice_type.as_str(),
                    "Invoice sequence unavailable; falling back to timestamp-derived number");
                format!("{}-TS{}", prefix, Utc::now().timestamp_millis())
            }
        }
    }

    async fn bump_sequence<C: ConnectionTrait>(
        conn: &C,
        invoice_type: InvoiceType,
    ) -> Result<i64, sea_orm::DbErr> {
        let key = invoice_type.as_str().to_string();
        let existing = SequenceEntity::find_by_id(key.clone()).one(conn).await?;

        match existing {
            Some(row) => {
                let value = row.next_value;
                let mut am: invoice_sequence::ActiveModel = row.into();
                am.next_value = Set(value + 1);
                am.update(conn).await?;
                Ok(value)
            }
            None => {
                let am = invoice_sequence::ActiveModel {
                    invoice_type: Set(key),
                    next_value: Set(2),
                };
                am.insert(conn).await?;
                Ok(1)
            }
        }
    }

    async fn insert_line_items<C: ConnectionTrait>(
        conn: &C,
        invoice_id: Uuid,
        items: &[LineItemInput],
        invoice_tax_rate: Decimal,
    ) -> Result<Vec<LineItemModel>, ServiceError> {
        let mut inserted = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let model = LineItemModel::new(
                invoice_id,
                item.item_type.clone().unwrap_or_else(|| "item".to_string()),
                item.description.clone(),
                item.quantity,
                item.unit_price,
                item.tax_rate.unwrap_or(invoice_tax_rate),
                item.discount_amount.unwrap_or(Decimal::ZERO),
                position as i32,
            );
            let am: invoice_line_item::ActiveModel = model.clone().into();
            am.insert(conn).await.map_err(|e| {
                error!(error = %e, invoice_id = %invoice_id, position, "Failed to insert line item");
                ServiceError::DatabaseError(e)
            })?;
            inserted.push(model);
        }
        Ok(inserted)
    }

    fn to_response(inv: InvoiceModel, items: Vec<LineItemModel>) -> InvoiceResponse {
        InvoiceResponse {
            id: inv.id,
            invoice_number: inv.invoice_number,
            invoice_type: inv.invoice_type,
            status: inv.status,
            payment_status: inv.payment_status,
            issued_by: inv.issued_by,
            issued_to: inv.issued_to,
            property_id: inv.property_id,
            customer_name: inv.customer_name,
            customer_email: inv.customer_email,
            customer_address: inv.customer_address,
            currency: inv.currency,
            subtotal: inv.subtotal,
            tax_rate: inv.tax_rate,
            tax_amount: inv.tax_amount,
            discount_amount: inv.discount_amount,
            total_amount: inv.total_amount,
            amount_paid: inv.amount_paid,
            amount_due: inv.amount_due,
            issue_date: inv.issue_date,
            due_date: inv.due_date,
            paid_date: inv.paid_date,
            notes: inv.notes,
            terms: inv.terms,
            created_at: inv.created_at,
            updated_at: inv.updated_at,
            line_items: items
                .into_iter()
                .map(|item| LineItemResponse {
                    id: item.id,
                    item_type: item.item_type,
                    description: item.description,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    tax_rate: item.tax_rate,
                    tax_amount: item.tax_amount,
                    discount_amount: item.discount_amount,
                    total_amount: item.total_amount,
                    position: item.position,
                })
                .collect(),
        }
    }
}
