//! Ledger engine: categories, transactions and budgets stored through
//! `sea-orm`, plus the read-only analytics computed over them.

pub use analytics::{
    Balance, BudgetDetail, BudgetStatus, BudgetUsage, CategorySpending, DateFilter, DateRange,
    MonthSummary, MonthlySummary, SpendingByCategory, Trend, TrendPeriod, TrendWindows,
};
pub use budgets::Budget;
pub use categories::Category;
pub use commands::{
    BudgetNew, BudgetPatch, CategoryNew, CategoryPatch, Patch, TransactionNew, TransactionPatch,
};
pub use error::{EngineError, FieldIssue};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, Page, PageRequest, Resource, TransactionListFilter};
pub use transactions::{Transaction, TransactionKind};

mod analytics;
mod budgets;
mod categories;
mod commands;
mod error;
mod money;
mod ops;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
