pub mod invoices;
pub mod payments;
pub mod refunds;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::entities::{invoice, property};
use crate::errors::ServiceError;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

/// Shared visibility rule for invoices and anything hanging off them.
///
/// Admins see everything; the issuer and the billed party see their own
/// invoices; a property owner additionally sees invoices attached to a
/// property they own.
pub(crate) async fn invoice_visible_to(
    db: &DbPool,
    caller: &AuthUser,
    inv: &invoice::Model,
) -> Result<bool, ServiceError> {
    if caller.is_admin() {
        return Ok(true);
    }
    if inv.issued_by == caller.user_id || inv.issued_to == caller.user_id {
        return Ok(true);
    }
    if caller.is_owner() {
        if let Some(property_id) = inv.property_id {
            let owned = property::Entity::find_by_id(property_id)
                .filter(property::Column::OwnerId.eq(caller.user_id))
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            return Ok(owned.is_some());
        }
    }
    Ok(false)
}
