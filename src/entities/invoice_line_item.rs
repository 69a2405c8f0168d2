use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line item owned by exactly one invoice. The set is replaced wholesale on
/// edit; rows are never patched individually.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub item_type: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub tax_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub discount_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    /// Zero-based display order, contiguous within the invoice
    pub position: i32,
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
    /// Build a line item, deriving the amount columns from quantity and price.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invoice_id: Uuid,
        item_type: String,
        description: String,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: Decimal,
        discount_amount: Decimal,
        position: i32,
    ) -> Self {
        let total_amount = quantity * unit_price;
        let tax_amount = total_amount * tax_rate / Decimal::ONE_HUNDRED;
        Self {
            id: Uuid::new_v4(),
            invoice_id,
            item_type,
            description,
            quantity,
            unit_price,
            tax_rate,
            tax_amount,
            discount_amount,
            total_amount,
            position,
        }
    }
}
