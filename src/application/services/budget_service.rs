//! Randomized university budget report.

use rand::Rng;

use crate::domain::entities::{BudgetCategory, BudgetReport};

/// Spending categories and their chart colours, in allocation order.
pub const BUDGET_CATEGORIES: [(&str, &str); 5] = [
    ("Dorming", "#FF6384"),
    ("Tuition", "#36A2EB"),
    ("Food", "#FFCE56"),
    ("Utilities", "#4BC0C0"),
    ("Entertainment", "#9966FF"),
];

/// Months covered by the income trend.
pub const TREND_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

const EXPENDITURE_RANGE: std::ops::Range<u64> = 1_000_000..5_000_000;
const INCOME_RANGE: std::ops::Range<u64> = 1_000_000..6_000_000;
/// Largest share of the remaining budget a single category may take.
const CATEGORY_SHARE: f64 = 0.4;

/// Generates a report from `rng`.
///
/// Every category but the last takes a random share of what is left; the
/// last one takes the remainder, so the amounts always add up to the
/// expenditures.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
/// Builds a random report from `rng`.
pub fn generate_budget<R: Rng + ?Sized>(rng: &mut R) -> BudgetReport {
    let expenditures = rng.random_range(EXPENDITURE_RANGE);
    let income = rng.random_range(INCOME_RANGE);

    let mut remaining = expenditures;
    let last = BUDGET_CATEGORIES.len() - 1;
    let categories = BUDGET_CATEGORIES
        .iter()
        .enumerate()
        .map(|(index, (name, color))| {
            let amount = if index == last {
                remaining
            } else {
                let share = (rng.random::<f64>() * remaining as f64 * CATEGORY_SHARE).floor() as u64;
                remaining -= share;
                share
            };
            BudgetCategory {
                name: (*name).to_string(),
                amount,
                color: (*color).to_string(),
            }
        })
        .collect();

    let income_trend = TREND_MONTHS
        .iter()
        .map(|month| ((*month).to_string(), income + rng.random_range(0..1000)))
        .collect();

    BudgetReport {
        income,
        expenditures,
        categories,
        income_trend,
    }
}

/// Produces fresh budget reports from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetService;

impl BudgetService {
    /// A fresh report from the thread-local RNG.
    #[must_use]
    pub fn regenerate(&self) -> BudgetReport {
        generate_budget(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_categories_sum_to_expenditures() {
        for seed in 0..200 {
            let report = generate_budget(&mut StdRng::seed_from_u64(seed));
            let total: u64 = report.categories.iter().map(|c| c.amount).sum();
            assert_eq!(total, report.expenditures, "seed {seed}");
        }
    }

    #[test]
    fn test_values_within_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let report = generate_budget(&mut rng);
            assert!(EXPENDITURE_RANGE.contains(&report.expenditures));
            assert!(INCOME_RANGE.contains(&report.income));
            for (_, amount) in &report.income_trend {
                assert!((report.income..report.income + 1000).contains(amount));
            }
        }
    }

    #[test]
    fn test_report_shape() {
        let report = BudgetService.regenerate();
        let names: Vec<&str> = report.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Dorming", "Tuition", "Food", "Utilities", "Entertainment"]);
        assert_eq!(report.income_trend.len(), 6);
        assert!(report.categories.iter().all(|c| c.rgb().is_some()));
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = generate_budget(&mut StdRng::seed_from_u64(7));
        let b = generate_budget(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
