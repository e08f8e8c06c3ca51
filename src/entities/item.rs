//! Item entity - A named, quantity-tracked slot in the vending machine.
//!
//! Items are created by the first restock of an unknown name and mutated by
//! buys and restocks. Deleting an item is a soft delete: the row is kept so
//! the transaction log still points at it, its quantity is zeroed and it is
//! hidden from every lookup.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business key, e.g. "coke"
    #[sea_orm(unique)]
    pub name: String,
    /// Units currently in stock, never negative
    pub qty: i64,
    /// Soft delete flag - if true, the item is hidden but its history is preserved
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    /// When the item was first stocked
    pub created_at: DateTime,
    /// When the item was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One item has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
