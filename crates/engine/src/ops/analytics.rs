//! Aggregations computed in SQL over the transactions table.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DbErr, QueryResult, Statement, Value};

use crate::{
    Balance, BudgetStatus, BudgetUsage, CategorySpending, DateFilter, EngineError, MonthSummary,
    MonthlySummary, Money, ResultEngine, SpendingByCategory, Trend, TrendPeriod, TransactionKind,
    util::validate_date_filter,
};

use super::Engine;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// `AND`-joined conditions with their positional parameters.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Conditions {
    fn push(&mut self, clause: impl Into<String>, value: impl Into<Value>) {
        self.clauses.push(clause.into());
        self.values.push(value.into());
    }

    fn dates(&mut self, column: &str, filter: &DateFilter) {
        if let Some(start) = filter.start_date {
            self.push(format!("{column} >= ?"), start);
        }
        if let Some(end) = filter.end_date {
            self.push(format!("{column} <= ?"), end);
        }
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn money(row: &QueryResult, column: &str) -> ResultEngine<Money> {
    Ok(Money::new(row.try_get::<i64>("", column)?))
}

impl Engine {
    async fn fetch_one(&self, sql: String, values: Vec<Value>) -> ResultEngine<Option<QueryResult>> {
        let stmt =
            Statement::from_sql_and_values(self.database.get_database_backend(), sql, values);
        Ok(self.database.query_one(stmt).await?)
    }

    async fn fetch_all(&self, sql: String, values: Vec<Value>) -> ResultEngine<Vec<QueryResult>> {
        let stmt =
            Statement::from_sql_and_values(self.database.get_database_backend(), sql, values);
        Ok(self.database.query_all(stmt).await?)
    }

    /// Income, expenses and their difference, optionally bounded by date.
    pub async fn balance(&self, filter: DateFilter) -> ResultEngine<Balance> {
        validate_date_filter(filter.start_date, filter.end_date)?;

        let mut conditions = Conditions::default();
        conditions.dates("date", &filter);
        let sql = format!(
            "SELECT \
               COALESCE(SUM(CASE WHEN kind = ? THEN amount_minor ELSE 0 END), 0) AS income, \
               COALESCE(SUM(CASE WHEN kind = ? THEN amount_minor ELSE 0 END), 0) AS expenses \
             FROM transactions{}",
            conditions.where_sql()
        );
        let mut values: Vec<Value> = vec![
            TransactionKind::Income.as_str().into(),
            TransactionKind::Expense.as_str().into(),
        ];
        values.extend(conditions.values);

        let (total_income, total_expenses) = match self.fetch_one(sql, values).await? {
            Some(row) => (money(&row, "income")?, money(&row, "expenses")?),
            None => (Money::ZERO, Money::ZERO),
        };
        Ok(Balance {
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
        })
    }

    /// Expense totals per category, largest first. Categories without
    /// expenses in the range are omitted.
    pub async fn spending_by_category(&self, filter: DateFilter) -> ResultEngine<SpendingByCategory> {
        validate_date_filter(filter.start_date, filter.end_date)?;

        let mut conditions = Conditions::default();
        conditions.push("t.kind = ?", TransactionKind::Expense.as_str());
        conditions.dates("t.date", &filter);
        let sql = format!(
            "SELECT c.id AS category_id, c.name AS category_name, \
                    SUM(t.amount_minor) AS total \
             FROM transactions t \
             JOIN categories c ON c.id = t.category_id{} \
             GROUP BY c.id, c.name \
             ORDER BY total DESC, c.name ASC",
            conditions.where_sql()
        );

        let rows = self.fetch_all(sql, conditions.values).await?;
        let mut totals = Vec::with_capacity(rows.len());
        for row in &rows {
            totals.push((
                row.try_get::<i64>("", "category_id")?,
                row.try_get::<String>("", "category_name")?,
                money(row, "total")?,
            ));
        }

        let total_spending = totals
            .iter()
            .try_fold(Money::ZERO, |sum, (_, _, total)| sum.checked_add(*total))
            .ok_or_else(|| DbErr::Custom("total spending overflows".to_string()))?;
        let items = totals
            .into_iter()
            .map(|(category_id, category_name, total)| CategorySpending {
                category_id,
                category_name,
                total,
                percentage: total.percent_of(total_spending).unwrap_or(0.0),
            })
            .collect();

        Ok(SpendingByCategory {
            items,
            total_spending,
        })
    }

    /// Income and expenses per calendar month of `year`. Months without
    /// transactions are omitted.
    pub async fn monthly_summary(&self, year: i32) -> ResultEngine<MonthlySummary> {
        let bounds = (MIN_YEAR..=MAX_YEAR)
            .contains(&year)
            .then(|| {
                NaiveDate::from_ymd_opt(year, 1, 1).zip(NaiveDate::from_ymd_opt(year, 12, 31))
            })
            .flatten();
        let Some((first, last)) = bounds else {
            return Err(EngineError::invalid(
                "year",
                format!("must be between {MIN_YEAR} and {MAX_YEAR}"),
            ));
        };

        let sql = "SELECT CAST(strftime('%m', date) AS INTEGER) AS month, \
                     COALESCE(SUM(CASE WHEN kind = ? THEN amount_minor ELSE 0 END), 0) AS income, \
                     COALESCE(SUM(CASE WHEN kind = ? THEN amount_minor ELSE 0 END), 0) AS expenses \
                   FROM transactions \
                   WHERE date >= ? AND date <= ? \
                   GROUP BY month \
                   ORDER BY month ASC"
            .to_string();
        let values: Vec<Value> = vec![
            TransactionKind::Income.as_str().into(),
            TransactionKind::Expense.as_str().into(),
            first.into(),
            last.into(),
        ];

        let mut items = Vec::new();
        for row in self.fetch_all(sql, values).await? {
            let month = row.try_get::<i64>("", "month")?;
            let month = u32::try_from(month)
                .map_err(|_| EngineError::invalid("month", format!("unexpected month {month}")))?;
            let income = money(&row, "income")?;
            let expenses = money(&row, "expenses")?;
            items.push(MonthSummary {
                year,
                month,
                income,
                expenses,
                net: income - expenses,
            });
        }

        Ok(MonthlySummary { year, items })
    }

    /// Usage of every budget whose window contains `today`, ordered by start date.
    pub async fn budget_status(&self, today: NaiveDate) -> ResultEngine<Vec<BudgetStatus>> {
        let sql = "SELECT b.id AS budget_id, b.name AS budget_name, \
                     b.amount_minor AS amount_minor, b.start_date AS start_date, \
                     b.end_date AS end_date, c.name AS category_name, \
                     (SELECT COALESCE(SUM(t.amount_minor), 0) FROM transactions t \
                       WHERE t.kind = ? \
                         AND t.date >= b.start_date AND t.date <= b.end_date \
                         AND (b.category_id IS NULL OR t.category_id = b.category_id)) AS spent \
                   FROM budgets b \
                   LEFT JOIN categories c ON c.id = b.category_id \
                   WHERE b.start_date <= ? AND b.end_date >= ? \
                   ORDER BY b.start_date ASC, b.id ASC"
            .to_string();
        let values: Vec<Value> = vec![
            TransactionKind::Expense.as_str().into(),
            today.into(),
            today.into(),
        ];

        let mut statuses = Vec::new();
        for row in self.fetch_all(sql, values).await? {
            let budget_amount = money(&row, "amount_minor")?;
            let spent = money(&row, "spent")?;
            statuses.push(BudgetStatus {
                budget_id: row.try_get("", "budget_id")?,
                budget_name: row.try_get("", "budget_name")?,
                budget_amount,
                start_date: row.try_get("", "start_date")?,
                end_date: row.try_get("", "end_date")?,
                category_name: row.try_get("", "category_name")?,
                usage: BudgetUsage::new(budget_amount, spent),
            });
        }
        Ok(statuses)
    }

    /// Expense totals of the current period-to-date against the previous period.
    pub async fn trends(&self, period: TrendPeriod, today: NaiveDate) -> ResultEngine<Trend> {
        let windows = period.windows(today);
        let sql = "SELECT \
                     COALESCE(SUM(CASE WHEN date >= ? AND date <= ? THEN amount_minor ELSE 0 END), 0) AS current_total, \
                     COALESCE(SUM(CASE WHEN date >= ? AND date <= ? THEN amount_minor ELSE 0 END), 0) AS previous_total \
                   FROM transactions \
                   WHERE kind = ? AND date >= ? AND date <= ?"
            .to_string();
        let values: Vec<Value> = vec![
            windows.current.start.into(),
            windows.current.end.into(),
            windows.previous.start.into(),
            windows.previous.end.into(),
            TransactionKind::Expense.as_str().into(),
            windows.previous.start.into(),
            windows.current.end.into(),
        ];

        let (current, previous) = match self.fetch_one(sql, values).await? {
            Some(row) => (money(&row, "current_total")?, money(&row, "previous_total")?),
            None => (Money::ZERO, Money::ZERO),
        };
        Ok(Trend::new(period, windows, current, previous))
    }
}
