use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-type monotonic counter backing invoice-number generation. Bumped
/// inside the invoice-creation transaction; the timestamp fallback in the
/// service only kicks in when this row cannot be read or updated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub invoice_type: String,
    pub next_value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
