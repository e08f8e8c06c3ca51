//! Chat boundary - from a free-text prompt to a decision or a transaction search.
//!
//! The flow is always: extract a structured record, re-validate it, then hand
//! it to the core. Validation is pure, so a rejected prompt never reaches the
//! database.

/// Extraction port
pub mod extractor;
/// Rule-based extractor
pub mod keyword;

pub use extractor::IntentExtractor;
pub use keyword::KeywordExtractor;

use crate::{
    core::{
        decision::{Outcome, make_decision},
        filter::TransactionFilter,
        intent::Command,
        transaction::{filter_transactions, item_names_for},
    },
    entities::ActionType,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, instrument};

/// A transaction as reported to callers, with the item's name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Transaction ID
    pub id: i64,
    /// Item ID
    pub item_id: i64,
    /// Item name at the time of the query
    pub item_name: String,
    /// Action taken
    pub action: ActionType,
    /// Quantity involved
    pub quantity: i64,
    /// When it happened
    pub date: DateTime<Utc>,
}

fn require_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(Error::validation("Please provide a prompt."));
    }
    Ok(())
}

/// Interprets an inventory prompt such as "restock 10 coke" and applies it.
///
/// # Errors
/// Returns an error if the prompt is blank, cannot be extracted, fails
/// validation, or is rejected by the decision engine.
#[instrument(skip(db, extractor), fields(extractor = extractor.name()))]
pub async fn handle_inventory_prompt(
    db: &DatabaseConnection,
    extractor: &dyn IntentExtractor,
    prompt: &str,
) -> Result<Outcome> {
    require_prompt(prompt)?;
    let intent = extractor.extract_intent(prompt).await?;
    debug!(?intent, "Intent extracted");

    let command = Command::try_from(intent)?;
    make_decision(db, command).await
}

/// Interprets a transaction prompt such as "coke buys since 2025-01-01" and
/// returns the matching log entries, oldest first.
///
/// # Errors
/// Returns an error if the prompt is blank, cannot be extracted, carries no
/// criteria, or matches no transactions.
#[instrument(skip(db, extractor), fields(extractor = extractor.name()))]
pub async fn handle_transaction_prompt(
    db: &DatabaseConnection,
    extractor: &dyn IntentExtractor,
    prompt: &str,
) -> Result<Vec<TransactionRecord>> {
    require_prompt(prompt)?;
    let query = extractor.extract_transaction_query(prompt).await?;
    debug!(?query, "Transaction query extracted");

    let filter = TransactionFilter::try_from(query)?;
    let transactions = filter_transactions(db, &filter).await?;
    let names = item_names_for(db, &transactions).await?;

    Ok(transactions
        .into_iter()
        .map(|transaction| TransactionRecord {
            id: transaction.id,
            item_id: transaction.item_id,
            item_name: names
                .get(&transaction.item_id)
                .cloned()
                .unwrap_or_default(),
            action: transaction.action,
            quantity: transaction.quantity,
            date: transaction.date,
        })
        .collect())
}
