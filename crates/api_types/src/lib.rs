//! JSON request and response bodies of the HTTP API.

use chrono::{DateTime, NaiveDate, Utc};
use engine::{Money, Patch};
use serde::{Deserialize, Serialize};

pub use engine::{TransactionKind, TrendPeriod};

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    impl From<CategoryCreate> for engine::CategoryNew {
        fn from(value: CategoryCreate) -> Self {
            Self {
                name: value.name,
                description: value.description,
            }
        }
    }

    /// Partial update. Omitted fields are left as they are; `"description": null` clears it.
    #[derive(Debug, Default, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub description: Patch<String>,
    }

    impl From<CategoryUpdate> for engine::CategoryPatch {
        fn from(value: CategoryUpdate) -> Self {
            Self {
                name: value.name,
                description: value.description,
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<engine::Category> for CategoryView {
        fn from(value: engine::Category) -> Self {
            Self {
                id: value.id,
                name: value.name,
                description: value.description,
                created_at: value.created_at,
                updated_at: value.updated_at,
            }
        }
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreate {
        pub amount: Money,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        #[serde(default)]
        pub description: Option<String>,
        pub date: NaiveDate,
        pub category_id: i64,
    }

    impl From<TransactionCreate> for engine::TransactionNew {
        fn from(value: TransactionCreate) -> Self {
            Self {
                amount: value.amount,
                kind: value.kind,
                description: value.description,
                date: value.date,
                category_id: value.category_id,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(default)]
        pub amount: Option<Money>,
        #[serde(default, rename = "type")]
        pub kind: Option<TransactionKind>,
        #[serde(default)]
        pub description: Patch<String>,
        #[serde(default)]
        pub date: Option<NaiveDate>,
        #[serde(default)]
        pub category_id: Option<i64>,
    }

    impl From<TransactionUpdate> for engine::TransactionPatch {
        fn from(value: TransactionUpdate) -> Self {
            Self {
                amount: value.amount,
                kind: value.kind,
                description: value.description,
                date: value.date,
                category_id: value.category_id,
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub amount: Money,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub category_id: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<engine::Transaction> for TransactionView {
        fn from(value: engine::Transaction) -> Self {
            Self {
                id: value.id,
                amount: value.amount,
                kind: value.kind,
                description: value.description,
                date: value.date,
                category_id: value.category_id,
                created_at: value.created_at,
                updated_at: value.updated_at,
            }
        }
    }

    /// Query string of `GET /api/transactions/`.
    #[derive(Debug, Default, Deserialize)]
    pub struct TransactionListQuery {
        pub category_id: Option<i64>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub page: Option<u64>,
        pub per_page: Option<u64>,
    }

    impl TransactionListQuery {
        pub fn filter(&self) -> engine::TransactionListFilter {
            engine::TransactionListFilter {
                category_id: self.category_id,
                kind: self.kind,
                start_date: self.start_date,
                end_date: self.end_date,
            }
        }

        pub fn page(&self) -> engine::PageRequest {
            let defaults = engine::PageRequest::default();
            engine::PageRequest::new(
                self.page.unwrap_or(defaults.page),
                self.per_page.unwrap_or(defaults.per_page),
            )
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub items: Vec<TransactionView>,
        pub total: u64,
        pub page: u64,
        pub per_page: u64,
    }

    impl From<engine::Page<engine::Transaction>> for TransactionListResponse {
        fn from(value: engine::Page<engine::Transaction>) -> Self {
            Self {
                items: value.items.into_iter().map(TransactionView::from).collect(),
                total: value.total,
                page: value.page,
                per_page: value.per_page,
            }
        }
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreate {
        pub name: String,
        pub amount: Money,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        #[serde(default)]
        pub category_id: Option<i64>,
    }

    impl From<BudgetCreate> for engine::BudgetNew {
        fn from(value: BudgetCreate) -> Self {
            Self {
                name: value.name,
                amount: value.amount,
                start_date: value.start_date,
                end_date: value.end_date,
                category_id: value.category_id,
            }
        }
    }

    /// Partial update; `"category_id": null` widens the budget to every category.
    #[derive(Debug, Default, Deserialize)]
    pub struct BudgetUpdate {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub amount: Option<Money>,
        #[serde(default)]
        pub start_date: Option<NaiveDate>,
        #[serde(default)]
        pub end_date: Option<NaiveDate>,
        #[serde(default)]
        pub category_id: Patch<i64>,
    }

    impl From<BudgetUpdate> for engine::BudgetPatch {
        fn from(value: BudgetUpdate) -> Self {
            Self {
                name: value.name,
                amount: value.amount,
                start_date: value.start_date,
                end_date: value.end_date,
                category_id: value.category_id,
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: i64,
        pub name: String,
        pub amount: Money,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub category_id: Option<i64>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<engine::Budget> for BudgetView {
        fn from(value: engine::Budget) -> Self {
            Self {
                id: value.id,
                name: value.name,
                amount: value.amount,
                start_date: value.start_date,
                end_date: value.end_date,
                category_id: value.category_id,
                created_at: value.created_at,
                updated_at: value.updated_at,
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetDetailView {
        #[serde(flatten)]
        pub budget: BudgetView,
        pub spent: Money,
        pub remaining: Money,
        pub percentage_used: f64,
    }

    impl From<engine::BudgetDetail> for BudgetDetailView {
        fn from(value: engine::BudgetDetail) -> Self {
            Self {
                budget: value.budget.into(),
                spent: value.usage.spent,
                remaining: value.usage.remaining,
                percentage_used: value.usage.percentage_used,
            }
        }
    }
}

pub mod analytics {
    use super::*;

    /// Optional inclusive date bounds shared by balance and spending reports.
    #[derive(Debug, Default, Deserialize)]
    pub struct DateRangeQuery {
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }

    impl From<DateRangeQuery> for engine::DateFilter {
        fn from(value: DateRangeQuery) -> Self {
            Self {
                start_date: value.start_date,
                end_date: value.end_date,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct MonthlySummaryQuery {
        pub year: Option<i32>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct TrendsQuery {
        pub period: Option<TrendPeriod>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub total_income: Money,
        pub total_expenses: Money,
        pub net_balance: Money,
    }

    impl From<engine::Balance> for BalanceView {
        fn from(value: engine::Balance) -> Self {
            Self {
                total_income: value.total_income,
                total_expenses: value.total_expenses,
                net_balance: value.net_balance,
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingView {
        pub category_id: i64,
        pub category_name: String,
        pub total: Money,
        pub percentage: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingByCategoryView {
        pub items: Vec<CategorySpendingView>,
        pub total_spending: Money,
    }

    impl From<engine::SpendingByCategory> for SpendingByCategoryView {
        fn from(value: engine::SpendingByCategory) -> Self {
            Self {
                items: value
                    .items
                    .into_iter()
                    .map(|item| CategorySpendingView {
                        category_id: item.category_id,
                        category_name: item.category_name,
                        total: item.total,
                        percentage: item.percentage,
                    })
                    .collect(),
                total_spending: value.total_spending,
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthSummaryView {
        pub year: i32,
        pub month: u32,
        pub income: Money,
        pub expenses: Money,
        pub net: Money,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummaryView {
        pub year: i32,
        pub items: Vec<MonthSummaryView>,
    }

    impl From<engine::MonthlySummary> for MonthlySummaryView {
        fn from(value: engine::MonthlySummary) -> Self {
            Self {
                year: value.year,
                items: value
                    .items
                    .into_iter()
                    .map(|m| MonthSummaryView {
                        year: m.year,
                        month: m.month,
                        income: m.income,
                        expenses: m.expenses,
                        net: m.net,
                    })
                    .collect(),
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub budget_id: i64,
        pub budget_name: String,
        pub budget_amount: Money,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub category_name: Option<String>,
        pub spent: Money,
        pub remaining: Money,
        pub percentage_used: f64,
    }

    impl From<engine::BudgetStatus> for BudgetStatusView {
        fn from(value: engine::BudgetStatus) -> Self {
            Self {
                budget_id: value.budget_id,
                budget_name: value.budget_name,
                budget_amount: value.budget_amount,
                start_date: value.start_date,
                end_date: value.end_date,
                category_name: value.category_name,
                spent: value.usage.spent,
                remaining: value.usage.remaining,
                percentage_used: value.usage.percentage_used,
            }
        }
    }

    /// Budgets active today.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusResponse {
        pub items: Vec<BudgetStatusView>,
    }

    impl FromIterator<engine::BudgetStatus> for BudgetStatusResponse {
        fn from_iter<I: IntoIterator<Item = engine::BudgetStatus>>(iter: I) -> Self {
            Self {
                items: iter.into_iter().map(BudgetStatusView::from).collect(),
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrendView {
        pub period: TrendPeriod,
        pub current_start: NaiveDate,
        pub current_end: NaiveDate,
        pub previous_start: NaiveDate,
        pub previous_end: NaiveDate,
        pub current_period_spending: Money,
        pub previous_period_spending: Money,
        pub change_amount: Money,
        pub change_percentage: Option<f64>,
    }

    impl From<engine::Trend> for TrendView {
        fn from(value: engine::Trend) -> Self {
            Self {
                period: value.period,
                current_start: value.current.start,
                current_end: value.current.end,
                previous_start: value.previous.start,
                previous_end: value.previous.end,
                current_period_spending: value.current_period_spending,
                previous_period_spending: value.previous_period_spending,
                change_amount: value.change_amount,
                change_percentage: value.change_percentage,
            }
        }
    }
}
