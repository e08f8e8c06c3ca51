//! Transaction entity - Immutable audit record of one inventory mutation.
//!
//! Each row carries the `item_id` it touched, the `action` taken, the
//! `quantity` involved and the `date` it happened. Rows are only ever written
//! by the decision engine and are never updated or deleted.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation recorded in the log.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Units sold to a customer
    #[sea_orm(string_value = "buy")]
    Buy,
    /// Units added to the machine
    #[sea_orm(string_value = "restock")]
    Restock,
    /// Item taken out of the machine
    #[sea_orm(string_value = "delete")]
    Delete,
}

impl ActionType {
    /// Lowercase name used in storage and in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Restock => "restock",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the item this transaction belongs to
    pub item_id: i64,
    /// What happened to the item
    pub action: ActionType,
    /// Quantity involved in the mutation
    pub quantity: i64,
    /// When the mutation happened, in whole seconds
    pub date: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one item
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
