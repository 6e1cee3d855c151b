//! University budget report.

use serde::{Deserialize, Serialize};

/// Spending bucket of the budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCategory {
    /// Category label.
    pub name: String,
    /// Share of the expenditures.
    pub amount: u64,
    /// Display colour as `#RRGGBB`.
    pub color: String,
}

impl BudgetCategory {
    /// Parses the display colour into RGB components.
    #[must_use]
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Income, expenditures and their breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// Total income.
    pub income: u64,
    /// Total spending; the category amounts add up to it.
    pub expenditures: u64,
    /// Spending per category.
    pub categories: Vec<BudgetCategory>,
    /// Monthly income trend as `(month, amount)` pairs.
    pub income_trend: Vec<(String, u64)>,
}

impl BudgetReport {
    /// Income left after expenditures; negative when overspent.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn balance(&self) -> i64 {
        self.income as i64 - self.expenditures as i64
    }
}
