use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, QueryOrder, Select, Statement, Value,
};

use crate::{
    Budget, BudgetDetail, BudgetNew, BudgetPatch, BudgetUsage, Money, ResultEngine,
    TransactionKind, budgets,
    error::Issues,
    util::{normalize_required_name, require_date_order, require_positive_amount},
};

use super::{Engine, Resource, categories::ensure_category_exists};

impl Resource for Budget {
    const LABEL: &'static str = "Budget";

    type Entity = budgets::Entity;
    type Model = budgets::Model;
    type PrimaryKey = budgets::PrimaryKey;
    type ActiveModel = budgets::ActiveModel;
    type New = BudgetNew;
    type Patch = BudgetPatch;

    fn from_model(model: budgets::Model) -> ResultEngine<Self> {
        Ok(model.into())
    }

    fn prepare_new(new: BudgetNew, now: DateTime<Utc>) -> ResultEngine<budgets::ActiveModel> {
        let mut issues = Issues::default();
        let name = issues.take(normalize_required_name(&new.name, "name"));
        let amount = issues.take(require_positive_amount(new.amount));
        issues.take(require_date_order(new.start_date, new.end_date));
        issues.finish()?;

        Ok(budgets::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            amount_minor: ActiveValue::Set(amount.cents()),
            start_date: ActiveValue::Set(new.start_date),
            end_date: ActiveValue::Set(new.end_date),
            category_id: ActiveValue::Set(new.category_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        })
    }

    fn prepare_patch(
        current: budgets::Model,
        patch: BudgetPatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<budgets::ActiveModel> {
        let mut issues = Issues::default();
        let start_date = patch.start_date.unwrap_or(current.start_date);
        let end_date = patch.end_date.unwrap_or(current.end_date);
        let category_id = patch.category_id.apply(current.category_id);
        let mut row: budgets::ActiveModel = current.into();

        if let Some(name) = patch.name {
            row.name = ActiveValue::Set(issues.take(normalize_required_name(&name, "name")));
        }
        if let Some(amount) = patch.amount {
            row.amount_minor =
                ActiveValue::Set(issues.take(require_positive_amount(amount)).cents());
        }
        issues.take(require_date_order(start_date, end_date));
        issues.finish()?;

        row.start_date = ActiveValue::Set(start_date);
        row.end_date = ActiveValue::Set(end_date);
        row.category_id = ActiveValue::Set(category_id);
        row.updated_at = ActiveValue::Set(now);
        Ok(row)
    }

    fn ordered(query: Select<budgets::Entity>) -> Select<budgets::Entity> {
        query
            .order_by_desc(budgets::Column::StartDate)
            .order_by_desc(budgets::Column::Id)
    }

    async fn check_write(
        db_tx: &DatabaseTransaction,
        row: &budgets::ActiveModel,
    ) -> ResultEngine<()> {
        if let ActiveValue::Set(Some(category_id)) = row.category_id {
            ensure_category_exists(db_tx, "category_id", category_id).await?;
        }
        Ok(())
    }

    async fn check_delete(_db_tx: &DatabaseTransaction, _id: i64) -> ResultEngine<()> {
        Ok(())
    }
}

/// Expense total inside the budget's window, limited to its category when it has one.
async fn budget_spent<C: ConnectionTrait>(db: &C, budget: &Budget) -> ResultEngine<Money> {
    let mut sql = String::from(
        "SELECT COALESCE(SUM(amount_minor), 0) AS spent FROM transactions \
         WHERE kind = ? AND date >= ? AND date <= ?",
    );
    let mut values: Vec<Value> = vec![
        TransactionKind::Expense.as_str().into(),
        budget.start_date.into(),
        budget.end_date.into(),
    ];
    if let Some(category_id) = budget.category_id {
        sql.push_str(" AND category_id = ?");
        values.push(category_id.into());
    }

    let stmt = Statement::from_sql_and_values(db.get_database_backend(), sql, values);
    let row = db.query_one(stmt).await?;
    let spent = row
        .map(|r| r.try_get::<i64>("", "spent"))
        .transpose()?
        .unwrap_or(0);
    Ok(Money::new(spent))
}

impl Engine {
    /// A budget together with how much of it has been spent.
    pub async fn budget_detail(&self, id: i64) -> ResultEngine<BudgetDetail> {
        let budget = self.get::<Budget>(id).await?;
        let spent = budget_spent(&self.database, &budget).await?;
        Ok(BudgetDetail {
            usage: BudgetUsage::new(budget.amount, spent),
            budget,
        })
    }
}
