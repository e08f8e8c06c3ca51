//! Rule-based extractor.
//!
//! Reads a prompt word by word: the first verb it knows decides the intention,
//! the first number is the quantity, ISO dates become the date criterion and
//! whatever is left once filler words are dropped is the item name. It needs no
//! network access, which makes it the default extractor and the one used in
//! tests.

use super::extractor::IntentExtractor;
use crate::{
    core::{
        filter::{ALL_ITEMS, ActionKind, DateInput, TransactionQuery},
        intent::{Intent, Intention},
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

const BUY_WORDS: &[&str] = &[
    "buy", "buys", "bought", "purchase", "purchases", "purchased", "sold", "sale", "sales",
];
const RESTOCK_WORDS: &[&str] = &[
    "restock", "restocks", "restocked", "refill", "refilled", "add", "added", "load",
];
const DELETE_WORDS: &[&str] = &[
    "delete", "deletes", "deleted", "remove", "removed", "removal", "discard",
];
const LIST_WORDS: &[&str] = &["list", "inventory", "everything"];
const RETRIEVE_WORDS: &[&str] = &["retrieve", "check", "how", "count", "quantity", "stock"];

const NUMBER_WORDS: &[(&str, i64)] = &[
    ("a", 1),
    ("an", 1),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("dozen", 12),
];

const FILLER_WORDS: &[&str] = &[
    "of", "the", "some", "please", "unit", "units", "can", "cans", "bottle", "bottles", "me",
    "i", "we", "you", "want", "would", "like", "to", "many", "much", "is", "are", "there", "in",
    "do", "does", "have", "has", "machine", "from", "left", "for", "with", "more", "item",
    "items", "soda", "sodas", "transaction", "transactions", "history", "since", "after",
    "between", "and", "on", "at", "show", "what", "all", "today", "yesterday", "made", "type",
];

/// Extractor driven by keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    /// Creates the extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn tokenize(prompt: &str) -> Vec<&str> {
    prompt
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '!' | '?' | ';' | '"' | '\''))
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_one_of(token: &str, words: &[&str]) -> bool {
    words.iter().any(|word| token.eq_ignore_ascii_case(word))
}

fn intention_of(token: &str) -> Option<Intention> {
    if is_one_of(token, BUY_WORDS) {
        Some(Intention::Buy)
    } else if is_one_of(token, RESTOCK_WORDS) {
        Some(Intention::Restock)
    } else if is_one_of(token, DELETE_WORDS) {
        Some(Intention::Delete)
    } else if is_one_of(token, LIST_WORDS) {
        Some(Intention::List)
    } else if is_one_of(token, RETRIEVE_WORDS) {
        Some(Intention::Retrieve)
    } else {
        None
    }
}

fn number_word(token: &str) -> Option<i64> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| token.eq_ignore_ascii_case(word))
        .map(|&(_, value)| value)
}

fn quantity_of(tokens: &[&str]) -> Option<i64> {
    tokens
        .iter()
        .find_map(|token| token.parse::<i64>().ok())
        .or_else(|| tokens.iter().find_map(|token| number_word(token)))
}

fn date_of(token: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    if token.eq_ignore_ascii_case("today") {
        return midnight(now.date_naive());
    }
    if token.eq_ignore_ascii_case("yesterday") {
        return midnight((now - Duration::days(1)).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        return midnight(date);
    }
    DateTime::parse_from_rfc3339(token)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn is_name_word(token: &str) -> bool {
    intention_of(token).is_none()
        && token.parse::<i64>().is_err()
        && number_word(token).is_none()
        && !is_one_of(token, FILLER_WORDS)
}

fn name_of(tokens: &[&str]) -> String {
    tokens
        .iter()
        .copied()
        .filter(|token| is_name_word(token))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn require_text(prompt: &str) -> Result<Vec<&str>> {
    let tokens = tokenize(prompt);
    if tokens.is_empty() {
        return Err(Error::Extraction {
            message: "the prompt is empty".to_string(),
        });
    }
    Ok(tokens)
}

impl KeywordExtractor {
    fn intent_from(tokens: &[&str]) -> Intent {
        let intention = tokens
            .iter()
            .find_map(|token| intention_of(token))
            .unwrap_or_default();

        Intent {
            intention,
            name: name_of(tokens),
            qty: quantity_of(tokens).unwrap_or_default(),
        }
    }

    fn query_from(tokens: &[&str], now: DateTime<Utc>) -> TransactionQuery {
        let action_type = tokens
            .iter()
            .find_map(|token| match intention_of(token) {
                Some(Intention::Buy) => Some(ActionKind::Buy),
                Some(Intention::Restock) => Some(ActionKind::Restock),
                Some(Intention::Delete) => Some(ActionKind::Delete),
                _ => None,
            })
            .unwrap_or_default();

        let mut dates: Vec<DateTime<Utc>> =
            tokens.iter().filter_map(|token| date_of(token, now)).collect();
        let date = match dates.len() {
            0 => None,
            1 => dates.pop().map(DateInput::Single),
            _ => Some(DateInput::Range(dates)),
        };

        let name_tokens: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|token| date_of(token, now).is_none())
            .collect();
        let mut item_name = name_of(&name_tokens);
        if item_name.is_empty() && tokens.iter().any(|token| token.eq_ignore_ascii_case(ALL_ITEMS))
        {
            item_name = ALL_ITEMS.to_string();
        }

        TransactionQuery {
            item_name,
            action_type,
            date,
        }
    }
}

#[async_trait]
impl IntentExtractor for KeywordExtractor {
    async fn extract_intent(&self, prompt: &str) -> Result<Intent> {
        let tokens = require_text(prompt)?;
        Ok(Self::intent_from(&tokens))
    }

    async fn extract_transaction_query(&self, prompt: &str) -> Result<TransactionQuery> {
        let tokens = require_text(prompt)?;
        Ok(Self::query_from(&tokens, Utc::now()))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
