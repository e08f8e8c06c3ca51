//! Inventory store - Handles all item-related persistence.
//!
//! Items are looked up by their unique name, created on first restock, adjusted
//! by buys and restocks, and soft deleted. Every function is generic over
//! [`ConnectionTrait`] so it runs the same on the pooled connection or inside
//! the database transaction the decision engine opens for each request.

use crate::{
    config::app::SeedItem,
    entities::{Item, item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Retrieves all active (non-deleted) items, ordered alphabetically by name.
pub async fn get_all_active_items<C>(db: &C) -> Result<Vec<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find()
        .filter(item::Column::IsDeleted.eq(false))
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an item by its exact name, returning None if not found or deleted.
pub async fn get_item_by_name<C>(db: &C, name: &str) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find()
        .filter(item::Column::Name.eq(name))
        .filter(item::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an item by its unique ID, deleted or not.
pub async fn get_item_by_id<C>(db: &C, item_id: i64) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find_by_id(item_id).one(db).await.map_err(Into::into)
}

async fn get_item_by_name_including_deleted<C>(db: &C, name: &str) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find()
        .filter(item::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new item, or re-enables a soft-deleted item with the same name.
///
/// The name is trimmed. Names are unique, so a deleted row is revived in place
/// rather than duplicated; its transaction history stays attached.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The quantity is negative
/// - An active item with this name already exists
/// - The database operation fails
#[instrument(skip(db))]
pub async fn create_item<C>(db: &C, name: &str, qty: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Item name cannot be empty"));
    }
    if qty < 0 {
        return Err(Error::validation(format!(
            "Quantity cannot be negative, got {qty}"
        )));
    }

    let now = chrono::Utc::now().naive_utc();

    match get_item_by_name_including_deleted(db, name).await? {
        Some(existing) if !existing.is_deleted => Err(Error::validation(format!(
            "Item '{name}' already exists."
        ))),
        Some(deleted) => {
            info!(item_id = deleted.id, "Re-enabling deleted item");
            let mut revived: item::ActiveModel = deleted.into();
            revived.qty = Set(qty);
            revived.is_deleted = Set(false);
            revived.updated_at = Set(now);
            revived.update(db).await.map_err(Into::into)
        }
        None => {
            let item = item::ActiveModel {
                name: Set(name.to_string()),
                qty: Set(qty),
                is_deleted: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            item.insert(db).await.map_err(Into::into)
        }
    }
}

/// Atomically adds `delta` to an item's quantity and returns the updated item.
///
/// A negative delta only applies while the stock covers it, so the quantity
/// can never drop below zero even if the caller's view of the item is stale.
///
/// # Errors
/// Returns an error if:
/// - The item does not exist or is deleted
/// - The stock is smaller than a requested decrement
/// - The new quantity would not fit in an `i64`
/// - The database operation fails
#[instrument(skip(db))]
pub async fn adjust_item_quantity<C>(db: &C, item_id: i64, delta: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    let item = get_item_by_id(db, item_id)
        .await?
        .filter(|item| !item.is_deleted)
        .ok_or_else(|| Error::ItemNotFound {
            name: item_id.to_string(),
        })?;

    if item.qty.checked_add(delta).is_none() {
        return Err(Error::validation(format!(
            "Quantity of '{}' cannot be changed by {delta}: the result is out of range.",
            item.name
        )));
    }

    let mut update = Item::update_many()
        .col_expr(item::Column::Qty, Expr::col(item::Column::Qty).add(delta))
        .col_expr(
            item::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(item::Column::Id.eq(item_id));
    if delta < 0 {
        update = update.filter(item::Column::Qty.gte(-delta));
    }

    let result = update.exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::InsufficientQuantity {
            name: item.name,
            available: item.qty,
            requested: -delta,
        });
    }

    debug!(item_id, delta, "Item quantity adjusted");
    get_item_by_id(db, item_id)
        .await?
        .ok_or_else(|| Error::Internal {
            message: format!("Item {item_id} disappeared during a quantity update"),
        })
}

/// Soft deletes an item: its stock is zeroed and it is hidden from lookups.
///
/// The row itself is preserved so the transaction log keeps a valid reference.
///
/// # Errors
/// Returns an error if:
/// - The item does not exist or is already deleted
/// - The database update operation fails
#[instrument(skip(db))]
pub async fn delete_item<C>(db: &C, item_id: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    let mut item: item::ActiveModel = get_item_by_id(db, item_id)
        .await?
        .filter(|item| !item.is_deleted)
        .ok_or_else(|| Error::ItemNotFound {
            name: item_id.to_string(),
        })?
        .into();

    item.qty = Set(0);
    item.is_deleted = Set(true);
    item.updated_at = Set(chrono::Utc::now().naive_utc());

    item.update(db).await.map_err(Into::into)
}

/// Stocks the machine with the configured items whose names are not known yet.
///
/// Names that already exist, including deleted ones, are left untouched, so
/// running this on every start is safe. Seeding does not write to the
/// transaction log. Returns the number of items created.
pub async fn seed_items(db: &DatabaseConnection, seeds: &[SeedItem]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if get_item_by_name_including_deleted(db, seed.name.trim())
            .await?
            .is_some()
        {
            debug!(name = %seed.name, "Seed item already present, skipping");
            continue;
        }
        create_item(db, &seed.name, seed.qty).await?;
        created += 1;
    }
    Ok(created)
}
