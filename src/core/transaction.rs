//! Transaction log - Append-only audit trail of inventory mutations.
//!
//! Rows are appended by the decision engine in the same database transaction as
//! the item mutation they describe. Reads go through [`filter_transactions`],
//! which narrows the log by item name, action and date, and treats an empty
//! result as a failure rather than an empty success.

use crate::{
    core::{
        filter::{DateFilter, TransactionFilter},
        item::get_item_by_id,
    },
    entities::{ActionType, Item, Transaction, item, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{JoinType, QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, instrument};

/// Appends one audit row for a mutation of `item_id`.
///
/// `date` is stored in whole seconds. Deleted items are accepted since a
/// delete is audited after the item has been hidden.
///
/// # Errors
/// Returns an error if:
/// - The quantity is negative, or zero for a buy or restock
/// - The item does not exist
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_transaction<C>(
    db: &C,
    item_id: i64,
    action: ActionType,
    quantity: i64,
    date: DateTime<Utc>,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    let must_be_positive = matches!(action, ActionType::Buy | ActionType::Restock);
    if quantity < 0 || (must_be_positive && quantity == 0) {
        return Err(Error::validation(format!(
            "Invalid quantity {quantity} for a {action} transaction"
        )));
    }

    get_item_by_id(db, item_id)
        .await?
        .ok_or_else(|| Error::ItemNotFound {
            name: item_id.to_string(),
        })?;

    let transaction_model = transaction::ActiveModel {
        item_id: Set(item_id),
        action: Set(action),
        quantity: Set(quantity),
        date: Set(date.trunc_subsecs(0)),
        ..Default::default()
    };

    transaction_model.insert(db).await.map_err(Into::into)
}

/// Retrieves all transactions for one item, newest first.
pub async fn get_transactions_for_item<C>(
    db: &C,
    item_id: i64,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::ItemId.eq(item_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Runs a filtered read over the transaction log.
///
/// Every criterion present in `filter` narrows the result (AND). Rows come
/// back oldest first.
///
/// # Errors
/// Returns [`Error::TransactionsNotFound`] when nothing matches, or a database
/// error if the query fails.
#[instrument(skip(db))]
pub async fn filter_transactions<C>(
    db: &C,
    filter: &TransactionFilter,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Transaction::find();

    if let Some(name) = &filter.item {
        query = query
            .join(JoinType::InnerJoin, transaction::Relation::Item.def())
            .filter(item::Column::Name.eq(name.as_str()));
    }

    if let Some(action) = filter.action {
        query = query.filter(transaction::Column::Action.eq(action));
    }

    query = match filter.date {
        DateFilter::Any => query,
        DateFilter::Since(at) => query.filter(transaction::Column::Date.gte(at)),
        DateFilter::Between { lo, hi } => {
            query.filter(transaction::Column::Date.between(lo, hi))
        }
    };

    let transactions = query
        .order_by_asc(transaction::Column::Date)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    if transactions.is_empty() {
        return Err(Error::TransactionsNotFound);
    }

    debug!(count = transactions.len(), "Transactions matched filter");
    Ok(transactions)
}

/// Looks up the item name behind each transaction, for display.
pub async fn item_names_for<C>(
    db: &C,
    transactions: &[transaction::Model],
) -> Result<std::collections::HashMap<i64, String>>
where
    C: ConnectionTrait,
{
    let ids: Vec<i64> = transactions.iter().map(|t| t.item_id).collect();
    let items = Item::find()
        .filter(item::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(items.into_iter().map(|item| (item.id, item.name)).collect())
}
