//! Read-only reporting over the ledger.
//!
//! These are the result shapes returned by the analytics operations on
//! [`Engine`](crate::Engine), plus the calendar math used by trends.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Budget, Money};

/// Optional inclusive bounds on a transaction's date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateFilter {
    #[must_use]
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balance {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_balance: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategorySpending {
    pub category_id: i64,
    pub category_name: String,
    pub total: Money,
    /// Share of `total_spending`, 0.0 when nothing was spent.
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpendingByCategory {
    pub items: Vec<CategorySpending>,
    pub total_spending: Money,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthSummary {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
}

/// Months without transactions are left out rather than zero-filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlySummary {
    pub year: i32,
    pub items: Vec<MonthSummary>,
}

/// How much of a budget has been used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BudgetUsage {
    pub spent: Money,
    pub remaining: Money,
    pub percentage_used: f64,
}

impl BudgetUsage {
    #[must_use]
    pub fn new(amount: Money, spent: Money) -> Self {
        Self {
            spent,
            remaining: amount - spent,
            percentage_used: spent.percent_of(amount).unwrap_or(0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetDetail {
    pub budget: Budget,
    pub usage: BudgetUsage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub budget_name: String,
    pub budget_amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Display name of the scoped category; `None` for all-category budgets.
    pub category_name: Option<String>,
    pub usage: BudgetUsage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendPeriod {
    #[default]
    Monthly,
    Weekly,
}

impl TrendPeriod {
    /// Current period-to-date and the full period before it.
    ///
    /// - weekly: `[monday of this week, today]` vs the 7 days before it
    /// - monthly: `[1st of this month, today]` vs the whole previous month
    #[must_use]
    pub fn windows(self, today: NaiveDate) -> TrendWindows {
        let current_start = match self {
            Self::Weekly => {
                today - Days::new(u64::from(today.weekday().num_days_from_monday()))
            }
            Self::Monthly => first_of_month(today),
        };
        let previous_end = current_start - Days::new(1);
        let previous_start = match self {
            Self::Weekly => current_start - Days::new(7),
            Self::Monthly => first_of_month(previous_end),
        };
        TrendWindows {
            current: DateRange {
                start: current_start,
                end: today,
            },
            previous: DateRange {
                start: previous_start,
                end: previous_end,
            },
        }
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.day0()))
}

/// Inclusive range of calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrendWindows {
    pub current: DateRange,
    pub previous: DateRange,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trend {
    pub period: TrendPeriod,
    pub current: DateRange,
    pub previous: DateRange,
    pub current_period_spending: Money,
    pub previous_period_spending: Money,
    pub change_amount: Money,
    /// `None` when the previous period had no spending.
    pub change_percentage: Option<f64>,
}

impl Trend {
    pub(crate) fn new(
        period: TrendPeriod,
        windows: TrendWindows,
        current_period_spending: Money,
        previous_period_spending: Money,
    ) -> Self {
        let change_amount = current_period_spending - previous_period_spending;
        let change_percentage = if previous_period_spending.is_positive() {
            change_amount.percent_of(previous_period_spending)
        } else {
            None
        };
        Self {
            period,
            current: windows.current,
            previous: windows.previous,
            current_period_spending,
            previous_period_spending,
            change_amount,
            change_percentage,
        }
    }
}
