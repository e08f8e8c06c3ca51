//! Extraction port.
//!
//! Turning free text into a structured request is delegated to an
//! [`IntentExtractor`]. The service ships [`super::KeywordExtractor`]; a
//! language-model backed implementation plugs in behind the same trait without
//! the core knowing about any provider.

use crate::{
    core::{filter::TransactionQuery, intent::Intent},
    errors::Result,
};
use async_trait::async_trait;

/// Capability that turns a user's prompt into a structured request.
///
/// Implementations only shape the record. Business rules are re-checked by
/// the boundary after extraction, so an extractor may return an `unknown`
/// intention, a blank name or a zero quantity.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Extracts an inventory request such as "restock 10 coke".
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::Extraction`] when no record can be
    /// produced from the prompt.
    async fn extract_intent(&self, prompt: &str) -> Result<Intent>;

    /// Extracts transaction search criteria such as "coke buys since 2025-01-01".
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::Extraction`] when no record can be
    /// produced from the prompt.
    async fn extract_transaction_query(&self, prompt: &str) -> Result<TransactionQuery>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
