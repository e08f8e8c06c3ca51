//! Decision engine - Applies a validated [`Command`] to the inventory.
//!
//! Each call runs as one unit of work: the item is resolved, the command's
//! preconditions are checked, the item is mutated and, for buys, restocks and
//! deletes, exactly one audit row is appended. All of it happens inside a
//! single database transaction, so an inventory change is never committed
//! without its audit row. Dropping the transaction on an error path rolls it
//! back.
//!
//! Policies:
//! - Restocking an unknown name creates the item with the restocked quantity
//!   and stops there (201); the quantity is not added a second time.
//! - Deleting is a soft delete: stock goes to zero and the item disappears from
//!   lookups and listings, while its row and history are kept. The audit row
//!   records the quantity that was removed.

use crate::{
    core::{
        intent::Command,
        item::{adjust_item_quantity, create_item, delete_item, get_all_active_items, get_item_by_name},
        transaction::create_transaction,
    },
    entities::{ActionType, item},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use tracing::{info, instrument};

/// Message returned by `list` when the machine is empty.
pub const NO_ITEMS_MESSAGE: &str = "No items available.";

/// Status of a successful decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The request was applied to an existing item, or was a read
    Ok,
    /// A new item was created
    Created,
}

impl Status {
    /// HTTP-style status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
        }
    }
}

/// Body of a successful decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Human-readable result
    Detail {
        /// The message
        detail: String,
    },
    /// Inventory records, for `list`
    Items(Vec<item::Model>),
}

/// Result of a successful decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Status to report
    pub status: Status,
    /// Body to report
    pub reply: Reply,
}

impl Outcome {
    fn ok(detail: String) -> Self {
        Self {
            status: Status::Ok,
            reply: Reply::Detail { detail },
        }
    }

    fn created(detail: String) -> Self {
        Self {
            status: Status::Created,
            reply: Reply::Detail { detail },
        }
    }

    /// The message text, if this outcome carries one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match &self.reply {
            Reply::Detail { detail } => Some(detail),
            Reply::Items(_) => None,
        }
    }
}

/// Audit row owed by a mutation.
struct Audit {
    item_id: i64,
    action: ActionType,
    quantity: i64,
}

type Decision = (Outcome, Option<Audit>);

/// Applies `command` to the inventory and records it in the transaction log.
///
/// # Errors
/// Returns an error if:
/// - The targeted item does not exist, for buy, delete and retrieve
/// - A buy asks for more than the stock
/// - A database operation fails
#[instrument(skip(db))]
pub async fn make_decision(db: &DatabaseConnection, command: Command) -> Result<Outcome> {
    let txn = db.begin().await?;

    let item = match command.item_name() {
        Some(name) => get_item_by_name(&txn, name).await?,
        None => None,
    };

    let (outcome, audit) = match command {
        Command::Buy { name, qty } => buy(&txn, item, name, qty).await?,
        Command::Restock { name, qty } => restock(&txn, item, name, qty).await?,
        Command::Delete { name } => delete(&txn, item, name).await?,
        Command::List => (list(&txn).await?, None),
        Command::Retrieve { name } => (retrieve(item, name)?, None),
    };

    if let Some(audit) = audit {
        create_transaction(
            &txn,
            audit.item_id,
            audit.action,
            audit.quantity,
            chrono::Utc::now(),
        )
        .await?;
        info!(
            item_id = audit.item_id,
            action = %audit.action,
            quantity = audit.quantity,
            "Inventory mutation recorded"
        );
    }

    txn.commit().await?;
    Ok(outcome)
}

async fn buy(
    txn: &DatabaseTransaction,
    item: Option<item::Model>,
    name: String,
    qty: i64,
) -> Result<Decision> {
    let item = item.ok_or_else(|| Error::ItemNotFound { name: name.clone() })?;

    if item.qty < qty {
        return Err(Error::InsufficientQuantity {
            name,
            available: item.qty,
            requested: qty,
        });
    }

    let updated = adjust_item_quantity(txn, item.id, -qty).await?;
    Ok((
        Outcome::ok(format!(
            "Successfully bought {qty} of '{name}'. Remaining quantity: {}.",
            updated.qty
        )),
        Some(Audit {
            item_id: item.id,
            action: ActionType::Buy,
            quantity: qty,
        }),
    ))
}

async fn restock(
    txn: &DatabaseTransaction,
    item: Option<item::Model>,
    name: String,
    qty: i64,
) -> Result<Decision> {
    let Some(item) = item else {
        let created = create_item(txn, &name, qty).await?;
        return Ok((
            Outcome::created(format!("Item '{name}' created with quantity {qty}.")),
            Some(Audit {
                item_id: created.id,
                action: ActionType::Restock,
                quantity: qty,
            }),
        ));
    };

    adjust_item_quantity(txn, item.id, qty).await?;
    Ok((
        Outcome::ok(format!("Item '{name}' restocked with quantity {qty}.")),
        Some(Audit {
            item_id: item.id,
            action: ActionType::Restock,
            quantity: qty,
        }),
    ))
}

async fn delete(
    txn: &DatabaseTransaction,
    item: Option<item::Model>,
    name: String,
) -> Result<Decision> {
    let item = item.ok_or_else(|| Error::ItemNotFound { name: name.clone() })?;

    delete_item(txn, item.id).await?;
    Ok((
        Outcome::ok(format!("Item '{name}' deleted successfully.")),
        Some(Audit {
            item_id: item.id,
            action: ActionType::Delete,
            quantity: item.qty,
        }),
    ))
}

async fn list(txn: &DatabaseTransaction) -> Result<Outcome> {
    let items = get_all_active_items(txn).await?;
    if items.is_empty() {
        return Ok(Outcome::ok(NO_ITEMS_MESSAGE.to_string()));
    }
    Ok(Outcome {
        status: Status::Ok,
        reply: Reply::Items(items),
    })
}

fn retrieve(item: Option<item::Model>, name: String) -> Result<Outcome> {
    let item = item.ok_or(Error::ItemNotFound { name })?;
    Ok(Outcome::ok(format!(
        "Item '{}' has quantity {}.",
        item.name, item.qty
    )))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{
        item::get_item_by_id,
        transaction::get_transactions_for_item,
    };
    use crate::entities::Transaction;
    use crate::test_utils::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    fn buy_cmd(name: &str, qty: i64) -> Command {
        Command::Buy {
            name: name.to_string(),
            qty,
        }
    }

    fn restock_cmd(name: &str, qty: i64) -> Command {
        Command::Restock {
            name: name.to_string(),
            qty,
        }
    }

    fn delete_cmd(name: &str) -> Command {
        Command::Delete {
            name: name.to_string(),
        }
    }

    fn retrieve_cmd(name: &str) -> Command {
        Command::Retrieve {
            name: name.to_string(),
        }
    }

    async fn transaction_count(db: &DatabaseConnection) -> Result<u64> {
        Ok(Transaction::find().count(db).await?)
    }

    #[tokio::test]
    async fn test_buy_within_stock() -> Result<()> {
        let (db, coke) = setup_with_item("coke", 10).await?;

        let outcome = make_decision(&db, buy_cmd("coke", 4)).await?;
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(
            outcome.detail(),
            Some("Successfully bought 4 of 'coke'. Remaining quantity: 6.")
        );
        assert_eq!(get_item_by_id(&db, coke.id).await?.unwrap().qty, 6);

        Ok(())
    }

    #[tokio::test]
    async fn test_buy_entire_stock() -> Result<()> {
        let (db, coke) = setup_with_item("coke", 3).await?;

        make_decision(&db, buy_cmd("coke", 3)).await?;
        assert_eq!(get_item_by_id(&db, coke.id).await?.unwrap().qty, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_buy_over_stock_leaves_item_unchanged() -> Result<()> {
        let (db, coke) = setup_with_item("coke", 2).await?;

        let err = make_decision(&db, buy_cmd("coke", 5)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientQuantity {
                available: 2,
                requested: 5,
                ..
            }
        ));
        assert_eq!(err.status_code(), 400);
        assert_eq!(get_item_by_id(&db, coke.id).await?.unwrap().qty, 2);
        assert_eq!(transaction_count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_buy_unknown_item_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let err = make_decision(&db, buy_cmd("pepsi", 3)).await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { ref name } if name == "pepsi"));
        assert_eq!(err.status_code(), 404);
        assert_eq!(transaction_count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_creates_then_increments() -> Result<()> {
        let db = setup_test_db().await?;

        let outcome = make_decision(&db, restock_cmd("coke", 10)).await?;
        assert_eq!(outcome.status, Status::Created);
        assert_eq!(outcome.status.code(), 201);
        assert_eq!(
            outcome.detail(),
            Some("Item 'coke' created with quantity 10.")
        );

        let coke = get_item_by_name(&db, "coke").await?.unwrap();
        // Created with the restocked quantity, not added twice
        assert_eq!(coke.qty, 10);

        let outcome = make_decision(&db, restock_cmd("coke", 5)).await?;
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(
            outcome.detail(),
            Some("Item 'coke' restocked with quantity 5.")
        );
        assert_eq!(get_item_by_id(&db, coke.id).await?.unwrap().qty, 15);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_item_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let err = make_decision(&db, delete_cmd("fanta")).await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));
        assert_eq!(transaction_count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_is_soft_and_hides_item() -> Result<()> {
        let (db, fanta) = setup_with_item("fanta", 7).await?;

        let outcome = make_decision(&db, delete_cmd("fanta")).await?;
        assert_eq!(outcome.detail(), Some("Item 'fanta' deleted successfully."));

        // Row kept with zero stock
        let row = get_item_by_id(&db, fanta.id).await?.unwrap();
        assert!(row.is_deleted);
        assert_eq!(row.qty, 0);

        let err = make_decision(&db, retrieve_cmd("fanta")).await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));

        let outcome = make_decision(&db, Command::List).await?;
        assert_eq!(outcome.detail(), Some(NO_ITEMS_MESSAGE));

        let err = make_decision(&db, buy_cmd("fanta", 1)).await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));

        // Audit row records the removed stock and still points at a real row
        let log = get_transactions_for_item(&db, fanta.id).await?;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ActionType::Delete);
        assert_eq!(log[0].quantity, 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_after_delete_revives_item() -> Result<()> {
        let (db, fanta) = setup_with_item("fanta", 7).await?;
        make_decision(&db, delete_cmd("fanta")).await?;

        let outcome = make_decision(&db, restock_cmd("fanta", 3)).await?;
        assert_eq!(outcome.status, Status::Created);

        let revived = get_item_by_name(&db, "fanta").await?.unwrap();
        assert_eq!(revived.id, fanta.id);
        assert_eq!(revived.qty, 3);
        assert_eq!(get_transactions_for_item(&db, fanta.id).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_past_max_quantity_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        make_decision(&db, restock_cmd("coke", i64::MAX)).await?;

        let err = make_decision(&db, restock_cmd("coke", 5)).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(err.status_code(), 400);

        let coke = get_item_by_name(&db, "coke").await?.unwrap();
        assert_eq!(coke.qty, i64::MAX);
        assert_eq!(get_transactions_for_item(&db, coke.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_empty_store() -> Result<()> {
        let db = setup_test_db().await?;

        let outcome = make_decision(&db, Command::List).await?;
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.detail(), Some(NO_ITEMS_MESSAGE));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_returns_records() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "pepsi", 2).await?;
        create_test_item(&db, "coke", 9).await?;

        let outcome = make_decision(&db, Command::List).await?;
        let Reply::Items(items) = outcome.reply else {
            panic!("expected item records");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "coke");
        assert_eq!(items[0].qty, 9);
        assert_eq!(items[1].name, "pepsi");
        assert_eq!(transaction_count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_retrieve() -> Result<()> {
        let (db, _coke) = setup_with_item("coke", 12).await?;

        let outcome = make_decision(&db, retrieve_cmd("coke")).await?;
        assert_eq!(outcome.detail(), Some("Item 'coke' has quantity 12."));
        assert_eq!(transaction_count(&db).await?, 0);

        let err = make_decision(&db, retrieve_cmd("sprite")).await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_each_mutation_appends_one_transaction() -> Result<()> {
        let db = setup_test_db().await?;

        make_decision(&db, restock_cmd("coke", 10)).await?;
        make_decision(&db, buy_cmd("coke", 4)).await?;
        make_decision(&db, restock_cmd("coke", 2)).await?;
        make_decision(&db, delete_cmd("coke")).await?;

        let coke = get_item_by_id(&db, 1).await?.unwrap();
        let log = get_transactions_for_item(&db, coke.id).await?;
        assert_eq!(log.len(), 4);

        // Newest first
        let entries: Vec<(ActionType, i64)> =
            log.iter().map(|t| (t.action, t.quantity)).collect();
        assert_eq!(
            entries,
            vec![
                (ActionType::Delete, 8),
                (ActionType::Restock, 2),
                (ActionType::Buy, 4),
                (ActionType::Restock, 10),
            ]
        );
        assert!(log.iter().all(|t| t.item_id == coke.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_quantity_never_negative_over_a_sequence() -> Result<()> {
        let db = setup_test_db().await?;
        make_decision(&db, restock_cmd("coke", 5)).await?;

        for qty in [2, 2, 2, 1, 3] {
            let _ = make_decision(&db, buy_cmd("coke", qty)).await;
            let coke = get_item_by_name(&db, "coke").await?.unwrap();
            assert!(coke.qty >= 0);
        }

        let coke = get_item_by_name(&db, "coke").await?.unwrap();
        // 5 - 2 - 2 = 1, the third buy of 2 fails, the buy of 1 empties it, the last fails
        assert_eq!(coke.qty, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_pepsi_scenario() -> Result<()> {
        let db = setup_test_db().await?;

        let err = make_decision(&db, buy_cmd("pepsi", 3)).await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));

        let outcome = make_decision(&db, restock_cmd("pepsi", 5)).await?;
        assert_eq!(outcome.status.code(), 201);
        let pepsi = get_item_by_name(&db, "pepsi").await?.unwrap();
        assert_eq!(pepsi.qty, 5);

        let before = transaction_count(&db).await?;
        let outcome = make_decision(&db, buy_cmd("pepsi", 3)).await?;
        assert_eq!(outcome.status.code(), 200);
        assert_eq!(get_item_by_id(&db, pepsi.id).await?.unwrap().qty, 2);
        assert_eq!(transaction_count(&db).await?, before + 1);

        let latest = &get_transactions_for_item(&db, pepsi.id).await?[0];
        assert_eq!(latest.action, ActionType::Buy);
        assert_eq!(latest.quantity, 3);

        Ok(())
    }
}
