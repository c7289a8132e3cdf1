//! Balance ranking entries and their ordering.

use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;

/// One row of the balance ranking. Derived from contract state, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub balance: TokenAmount,
}

impl RankingEntry {
    pub fn new(name: impl Into<String>, balance: TokenAmount) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }

    /// Balance as a full-precision decimal string, for display.
    pub fn balance_display(&self) -> String {
        self.balance.to_decimal_string()
    }
}

/// Order entries by descending balance.
///
/// Compares the base-unit integers, never the rendered strings. The sort is
/// stable, so equal balances keep their roster order.
pub fn rank(mut entries: Vec<RankingEntry>) -> Vec<RankingEntry> {
    entries.sort_by(|a, b| b.balance.cmp(&a.balance));
    entries
}
