use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Patch, ResultEngine, Transaction, TransactionKind, TransactionNew,
    TransactionPatch,
    error::Issues,
    transactions,
    util::{normalize_optional_text, require_positive_amount, validate_date_filter},
};

use super::{Engine, Resource, categories::ensure_category_exists, with_tx};

/// Filters for listing transactions. Date bounds are inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransactionListFilter {
    pub category_id: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// One-based page selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u64 = 20;
    pub const MAX_PER_PAGE: u64 = 100;

    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    fn validate(self, issues: &mut Issues) {
        if self.page < 1 {
            issues.push("page", "must be at least 1");
        }
        if !(1..=Self::MAX_PER_PAGE).contains(&self.per_page) {
            issues.push(
                "per_page",
                format!("must be between 1 and {}", Self::MAX_PER_PAGE),
            );
        }
    }

    fn offset(self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// A page of results plus the total number of matching rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(start) = filter.start_date {
            self = self.filter(transactions::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(transactions::Column::Date.lte(end));
        }
        self
    }
}

impl Resource for Transaction {
    const LABEL: &'static str = "Transaction";

    type Entity = transactions::Entity;
    type Model = transactions::Model;
    type PrimaryKey = transactions::PrimaryKey;
    type ActiveModel = transactions::ActiveModel;
    type New = TransactionNew;
    type Patch = TransactionPatch;

    fn from_model(model: transactions::Model) -> ResultEngine<Self> {
        Transaction::try_from(model)
    }

    fn prepare_new(
        new: TransactionNew,
        now: DateTime<Utc>,
    ) -> ResultEngine<transactions::ActiveModel> {
        let mut issues = Issues::default();
        let amount = issues.take(require_positive_amount(new.amount));
        let description =
            issues.take(normalize_optional_text(new.description.as_deref(), "description"));
        issues.finish()?;

        Ok(transactions::ActiveModel {
            id: ActiveValue::NotSet,
            amount_minor: ActiveValue::Set(amount.cents()),
            kind: ActiveValue::Set(new.kind.as_str().to_string()),
            description: ActiveValue::Set(description),
            date: ActiveValue::Set(new.date),
            category_id: ActiveValue::Set(new.category_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        })
    }

    fn prepare_patch(
        current: transactions::Model,
        patch: TransactionPatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<transactions::ActiveModel> {
        let mut issues = Issues::default();
        let mut row: transactions::ActiveModel = current.into();

        if let Some(amount) = patch.amount {
            row.amount_minor = ActiveValue::Set(issues.take(require_positive_amount(amount)).cents());
        }
        if let Some(kind) = patch.kind {
            row.kind = ActiveValue::Set(kind.as_str().to_string());
        }
        match patch.description {
            Patch::Absent => {}
            Patch::Null => row.description = ActiveValue::Set(None),
            Patch::Value(text) => {
                row.description = ActiveValue::Set(
                    issues.take(normalize_optional_text(Some(&text), "description")),
                );
            }
        }
        if let Some(date) = patch.date {
            row.date = ActiveValue::Set(date);
        }
        if let Some(category_id) = patch.category_id {
            row.category_id = ActiveValue::Set(category_id);
        }
        issues.finish()?;

        row.updated_at = ActiveValue::Set(now);
        Ok(row)
    }

    fn ordered(query: Select<transactions::Entity>) -> Select<transactions::Entity> {
        query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id)
    }

    async fn check_write(
        db_tx: &DatabaseTransaction,
        row: &transactions::ActiveModel,
    ) -> ResultEngine<()> {
        if let ActiveValue::Set(category_id) = row.category_id {
            ensure_category_exists(db_tx, "category_id", category_id).await?;
        }
        Ok(())
    }

    async fn check_delete(_db_tx: &DatabaseTransaction, _id: i64) -> ResultEngine<()> {
        Ok(())
    }
}

impl Engine {
    /// Lists transactions matching `filter`, newest first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionListFilter,
        page: PageRequest,
    ) -> ResultEngine<Page<Transaction>> {
        let mut issues = Issues::default();
        issues.take(validate_date_filter(filter.start_date, filter.end_date));
        page.validate(&mut issues);
        issues.finish()?;

        with_tx!(self, |db_tx| {
            let total = transactions::Entity::find()
                .apply_tx_filters(filter)
                .count(&db_tx)
                .await?;

            let rows = Transaction::ordered(transactions::Entity::find().apply_tx_filters(filter))
                .offset(page.offset())
                .limit(page.per_page)
                .all(&db_tx)
                .await?;

            let items = rows
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok::<_, EngineError>(Page {
                items,
                total,
                page: page.page,
                per_page: page.per_page,
            })
        })
    }
}
