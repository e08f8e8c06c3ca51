//! Transaction filter criteria.
//!
//! [`TransactionQuery`] is the loose record an extractor produces from a prompt:
//! sentinel strings, an `unknown` action and a date that may be one timestamp
//! or a list. [`TransactionFilter`] is the validated form the query engine
//! runs, with sentinels resolved to `None` and ranges normalised.

use crate::{
    entities::ActionType,
    errors::{Error, Result},
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Item name sentinel meaning "every item".
pub const ALL_ITEMS: &str = "all";

/// Action named in a transaction prompt, `Unknown` when none was recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Only buys
    Buy,
    /// Only restocks
    Restock,
    /// Only deletions
    Delete,
    /// No action filter
    #[default]
    Unknown,
}

impl ActionKind {
    /// The stored action this kind narrows to, `None` for the sentinel.
    #[must_use]
    pub const fn action(self) -> Option<ActionType> {
        match self {
            Self::Buy => Some(ActionType::Buy),
            Self::Restock => Some(ActionType::Restock),
            Self::Delete => Some(ActionType::Delete),
            Self::Unknown => None,
        }
    }
}

/// A date as produced by an extractor: one timestamp or a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    /// On or after this instant
    Single(DateTime<Utc>),
    /// Between the earliest and latest of these instants, inclusive
    Range(Vec<DateTime<Utc>>),
}

/// Raw transaction criteria extracted from a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Item to narrow to; `"all"` or blank for every item
    #[serde(default)]
    pub item_name: String,
    /// Action to narrow to
    #[serde(default)]
    pub action_type: ActionKind,
    /// Date criterion, if any
    #[serde(default)]
    pub date: Option<DateInput>,
}

/// Date criterion of a [`TransactionFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    /// No restriction
    #[default]
    Any,
    /// `date >= at`
    Since(DateTime<Utc>),
    /// `lo <= date <= hi`
    Between {
        /// Earliest instant, inclusive
        lo: DateTime<Utc>,
        /// Latest instant, inclusive
        hi: DateTime<Utc>,
    },
}

impl DateFilter {
    /// Open-ended lower bound.
    #[must_use]
    pub fn since(at: DateTime<Utc>) -> Self {
        Self::Since(at.trunc_subsecs(0))
    }

    /// Inclusive range; the bounds may be given in either order.
    #[must_use]
    pub fn between(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        let (a, b) = (a.trunc_subsecs(0), b.trunc_subsecs(0));
        Self::Between {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    fn from_input(input: Option<DateInput>) -> Self {
        match input {
            None => Self::Any,
            Some(DateInput::Single(at)) => Self::since(at),
            Some(DateInput::Range(dates)) => {
                match (dates.iter().min(), dates.iter().max()) {
                    (Some(&lo), Some(&hi)) => Self::between(lo, hi),
                    _ => Self::Any,
                }
            }
        }
    }
}

/// Validated transaction criteria, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Exact item name
    pub item: Option<String>,
    /// Stored action
    pub action: Option<ActionType>,
    /// Date criterion
    pub date: DateFilter,
}

impl TransactionFilter {
    /// Narrows to one item by exact name.
    #[must_use]
    pub fn with_item(mut self, name: impl Into<String>) -> Self {
        self.item = Some(name.into());
        self
    }

    /// Narrows to one action.
    #[must_use]
    pub const fn with_action(mut self, action: ActionType) -> Self {
        self.action = Some(action);
        self
    }

    /// Narrows by date.
    #[must_use]
    pub const fn with_date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self
    }
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = Error;

    /// Rejects a query that carries nothing at all: blank name, no action and
    /// no date. An explicit `"all"` is a real request for everything.
    fn try_from(query: TransactionQuery) -> Result<Self> {
        let name = query.item_name.trim();
        let has_date = match &query.date {
            None => false,
            Some(DateInput::Single(_)) => true,
            Some(DateInput::Range(dates)) => !dates.is_empty(),
        };

        if name.is_empty() && query.action_type == ActionKind::Unknown && !has_date {
            return Err(Error::validation(
                "No data returned from the model. Please provide a valid prompt.",
            ));
        }

        let item = (!name.is_empty() && name != ALL_ITEMS).then(|| name.to_string());

        Ok(Self {
            item,
            action: query.action_type.action(),
            date: DateFilter::from_input(query.date),
        })
    }
}
