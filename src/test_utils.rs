//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database, creating items with sensible
//! defaults, and an extractor that returns canned records.

use crate::{
    chat::IntentExtractor,
    core::{filter::TransactionQuery, intent::Intent, item},
    entities,
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an item directly in the store, bypassing the decision engine, so
/// no transaction is logged.
pub async fn create_test_item(
    db: &DatabaseConnection,
    name: &str,
    qty: i64,
) -> Result<entities::item::Model> {
    item::create_item(db, name, qty).await
}

/// Sets up a fresh database holding a single item.
/// Returns (db, item) for common test scenarios.
pub async fn setup_with_item(
    name: &str,
    qty: i64,
) -> Result<(DatabaseConnection, entities::item::Model)> {
    let db = setup_test_db().await?;
    let item = create_test_item(&db, name, qty).await?;
    Ok((db, item))
}

/// Extractor that ignores the prompt and returns a fixed record.
pub struct StaticExtractor {
    intent: Option<Intent>,
    query: Option<TransactionQuery>,
}

impl StaticExtractor {
    /// Always extracts `intent`.
    pub fn intent(intent: Intent) -> Self {
        Self {
            intent: Some(intent),
            query: None,
        }
    }

    /// Always extracts `query`.
    pub fn query(query: TransactionQuery) -> Self {
        Self {
            intent: None,
            query: Some(query),
        }
    }
}

#[async_trait]
impl IntentExtractor for StaticExtractor {
    async fn extract_intent(&self, _prompt: &str) -> Result<Intent> {
        self.intent.clone().ok_or_else(|| Error::Extraction {
            message: "no intent configured".to_string(),
        })
    }

    async fn extract_transaction_query(&self, _prompt: &str) -> Result<TransactionQuery> {
        self.query.clone().ok_or_else(|| Error::Extraction {
            message: "no query configured".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
