//! Intents and commands.
//!
//! An [`Intent`] is what an extractor hands over: an intention token, a name
//! and a quantity, none of which are trusted. [`Command`] is the closed,
//! validated form the decision engine accepts. Converting one into the other
//! is pure, so a bad request is rejected before any database access.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What the user asked for.
///
/// Deserialised through [`FromStr`], so tokens are matched case-insensitively
/// and an unrecognised one is reported by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Intention {
    /// Take units out of stock
    Buy,
    /// Put units into stock, creating the item if needed
    Restock,
    /// Remove the item from the machine
    Delete,
    /// Show the whole inventory
    List,
    /// Show one item's stock
    Retrieve,
    /// Nothing recognisable
    #[default]
    Unknown,
}

impl Intention {
    /// Lowercase token for this intention.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Restock => "restock",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Retrieve => "retrieve",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intention {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "restock" => Ok(Self::Restock),
            "delete" => Ok(Self::Delete),
            "list" => Ok(Self::List),
            "retrieve" => Ok(Self::Retrieve),
            "unknown" => Ok(Self::Unknown),
            _ => Err(Error::InvalidIntention {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Intention {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Structured request as produced by an extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Requested action
    pub intention: Intention,
    /// Item name, may be blank for `list`
    #[serde(default)]
    pub name: String,
    /// Quantity, meaningful for `buy` and `restock`
    #[serde(default)]
    pub qty: i64,
}

impl Intent {
    /// Convenience constructor.
    pub fn new(intention: Intention, name: impl Into<String>, qty: i64) -> Self {
        Self {
            intention,
            name: name.into(),
            qty,
        }
    }
}

/// A validated inventory command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sell `qty` units of `name`
    Buy {
        /// Item name
        name: String,
        /// Units to sell, positive
        qty: i64,
    },
    /// Add `qty` units of `name`
    Restock {
        /// Item name
        name: String,
        /// Units to add, positive
        qty: i64,
    },
    /// Remove `name` from the machine
    Delete {
        /// Item name
        name: String,
    },
    /// Show everything
    List,
    /// Show the stock of `name`
    Retrieve {
        /// Item name
        name: String,
    },
}

impl Command {
    /// Item the command targets, if any.
    #[must_use]
    pub fn item_name(&self) -> Option<&str> {
        match self {
            Self::Buy { name, .. }
            | Self::Restock { name, .. }
            | Self::Delete { name }
            | Self::Retrieve { name } => Some(name),
            Self::List => None,
        }
    }
}

fn required_name(intent: &Intent) -> Result<String> {
    let name = intent.name.trim();
    if name.is_empty() {
        return Err(Error::validation(format!(
            "An item name is required to {}.",
            intent.intention
        )));
    }
    Ok(name.to_string())
}

fn positive_qty(intent: &Intent) -> Result<i64> {
    if intent.qty <= 0 {
        return Err(Error::validation(format!(
            "Quantity to {} must be greater than zero, got {}.",
            intent.intention, intent.qty
        )));
    }
    Ok(intent.qty)
}

impl TryFrom<Intent> for Command {
    type Error = Error;

    fn try_from(intent: Intent) -> Result<Self> {
        match intent.intention {
            Intention::Buy => Ok(Self::Buy {
                name: required_name(&intent)?,
                qty: positive_qty(&intent)?,
            }),
            Intention::Restock => Ok(Self::Restock {
                name: required_name(&intent)?,
                qty: positive_qty(&intent)?,
            }),
            Intention::Delete => Ok(Self::Delete {
                name: required_name(&intent)?,
            }),
            Intention::List => Ok(Self::List),
            Intention::Retrieve => Ok(Self::Retrieve {
                name: required_name(&intent)?,
            }),
            Intention::Unknown => Err(Error::InvalidIntention {
                value: intent.intention.to_string(),
            }),
        }
    }
}
