use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Accepted settlement channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "stripe")]
    Stripe,
    #[sea_orm(string_value = "paypal")]
    Paypal,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "check")]
    Check,
    #[sea_orm(string_value = "other")]
    Other,
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Some(PaymentMethod::Stripe),
            "paypal" => Some(PaymentMethod::Paypal),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "cash" => Some(PaymentMethod::Cash),
            "check" => Some(PaymentMethod::Check),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }
}

/// Payments are born completed and can only move to refunded, once.
/// Pending/failed gateway states never reach this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub payment_method: PaymentMethod,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: NaiveDate,
    pub status: PaymentState,

    /// Payer identity, stamped from the invoice at creation
    pub payer_id: Uuid,
    pub payer_name: String,
    pub payer_email: String,

    pub gateway_reference: Option<String>,
    pub notes: Option<String>,
    /// Free-form annotations; the refund path records refund_date,
    /// refund_amount, refund_reason and refunded_by here
    pub metadata: Option<Json>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_refundable(&self) -> bool {
        self.status == PaymentState::Completed
    }
}
