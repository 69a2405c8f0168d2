use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of money movement recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "refund")]
    Refund,
}

/// Append-only audit ledger. Rows are written once, alongside the payment or
/// refund they record, and there is no API that updates or deletes them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_type: TransactionType,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub currency: String,

    /// Kind of record that produced this entry (e.g. "payment")
    pub source_type: String,
    pub source_id: Uuid,

    pub from_user_id: Uuid,
    pub to_user_id: Uuid,

    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub status: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_refund(&self) -> bool {
        self.transaction_type == TransactionType::Refund
    }

    /// Signed amount (positive for income, negative for refunds)
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Refund => -self.amount,
        }
    }
}
