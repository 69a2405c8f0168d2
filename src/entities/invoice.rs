use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Invoice categories; each carries its own number prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    #[sea_orm(string_value = "rental")]
    Rental,
    #[sea_orm(string_value = "operational")]
    Operational,
    #[sea_orm(string_value = "custom")]
    Custom,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Rental => "rental",
            InvoiceType::Operational => "operational",
            InvoiceType::Custom => "custom",
        }
    }

    /// Human-facing invoice number prefix for this type
    pub fn number_prefix(&self) -> &'static str {
        match self {
            InvoiceType::Rental => "RNT",
            InvoiceType::Operational => "OPS",
            InvoiceType::Custom => "CST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rental" => Some(InvoiceType::Rental),
            "operational" => Some(InvoiceType::Operational),
            "custom" => Some(InvoiceType::Custom),
            _ => None,
        }
    }
}

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl InvoiceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(InvoiceStatus::Draft),
            "sent" => Some(InvoiceStatus::Sent),
            "paid" => Some(InvoiceStatus::Paid),
            "cancelled" | "canceled" => Some(InvoiceStatus::Cancelled),
            "refunded" => Some(InvoiceStatus::Refunded),
            _ => None,
        }
    }
}

/// Settlement projection, derived from the aggregates on every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum InvoicePaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub invoice_number: String,
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    pub payment_status: InvoicePaymentStatus,

    /// Party that issued the invoice and owns its lifecycle
    pub issued_by: Uuid,
    /// Party being billed; the only party allowed to pay
    pub issued_to: Uuid,
    /// Property this invoice belongs to, when rental-related
    pub property_id: Option<Uuid>,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: Option<String>,

    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub tax_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub discount_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_due: Decimal,

    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,

    pub notes: Option<String>,
    pub terms: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_line_item::Entity")]
    LineItems,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id"
    )]
    Property,
}

impl Related<super::invoice_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Settlement status as a pure function of the aggregates.
    ///
    /// `amount_due <= 0` means paid in full; a positive balance with anything
    /// paid is partial; nothing paid is unpaid. The `refunded` projection is
    /// not derivable from the amounts alone (a never-paid invoice and a fully
    /// refunded one both sit at zero) and is assigned by the refund path.
    pub fn derive_payment_status(
        amount_paid: Decimal,
        amount_due: Decimal,
    ) -> InvoicePaymentStatus {
        if amount_due <= Decimal::ZERO {
            InvoicePaymentStatus::Paid
        } else if amount_paid > Decimal::ZERO {
            InvoicePaymentStatus::Partial
        } else {
            InvoicePaymentStatus::Unpaid
        }
    }

    /// Line items and financial fields may only change while drafting
    pub fn is_editable(&self) -> bool {
        self.status == InvoiceStatus::Draft
    }

    /// Cancellation is reachable from draft and sent only
    pub fn is_cancellable(&self) -> bool {
        matches!(self.status, InvoiceStatus::Draft | InvoiceStatus::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payment_status_derivation() {
        assert_eq!(
            Model::derive_payment_status(dec!(0), dec!(110)),
            InvoicePaymentStatus::Unpaid
        );
        assert_eq!(
            Model::derive_payment_status(dec!(60), dec!(50)),
            InvoicePaymentStatus::Partial
        );
        assert_eq!(
            Model::derive_payment_status(dec!(110), dec!(0)),
            InvoicePaymentStatus::Paid
        );
        // Overshoot still reads as paid
        assert_eq!(
            Model::derive_payment_status(dec!(120), dec!(-10)),
            InvoicePaymentStatus::Paid
        );
        // Zero-total invoice is born settled
        assert_eq!(
            Model::derive_payment_status(dec!(0), dec!(0)),
            InvoicePaymentStatus::Paid
        );
    }

    #[test]
    fn number_prefix_per_type() {
        assert_eq!(InvoiceType::Rental.number_prefix(), "RNT");
        assert_eq!(InvoiceType::Operational.number_prefix(), "OPS");
        assert_eq!(InvoiceType::Custom.number_prefix(), "CST");
    }

    #[test]
    fn invoice_type_parsing() {
        assert_eq!(InvoiceType::parse("rental"), Some(InvoiceType::Rental));
        assert_eq!(InvoiceType::parse(" Custom "), Some(InvoiceType::Custom));
        assert_eq!(InvoiceType::parse("subscription"), None);
    }

    #[test]
    fn status_parsing_accepts_both_cancelled_spellings() {
        assert_eq!(
            InvoiceStatus::parse("cancelled"),
            Some(InvoiceStatus::Cancelled)
        );
        assert_eq!(
            InvoiceStatus::parse("canceled"),
            Some(InvoiceStatus::Cancelled)
        );
    }
}
