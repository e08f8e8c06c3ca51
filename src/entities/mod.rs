//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod item;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use item::{Entity as Item, Model as ItemModel};
pub use transaction::{ActionType, Entity as Transaction, Model as TransactionModel};
