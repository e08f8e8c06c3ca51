//! Core business logic - framework-agnostic inventory, decision and
//! transaction log operations.

/// Decision engine mapping commands to inventory mutations
pub mod decision;
/// Transaction filter criteria
pub mod filter;
/// Intents and validated commands
pub mod intent;
/// Inventory store
pub mod item;
/// Transaction log and query engine
pub mod transaction;
