use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    Budget, BudgetNew, Category, CategoryNew, DateFilter, Engine, EngineError, Money,
    Transaction, TransactionKind, TransactionNew, TrendPeriod,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn category(engine: &Engine, name: &str) -> i64 {
    engine
        .create::<Category>(CategoryNew {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id
}

async fn record(
    engine: &Engine,
    kind: TransactionKind,
    category_id: i64,
    cents: i64,
    date: NaiveDate,
) {
    engine
        .create::<Transaction>(TransactionNew {
            amount: Money::new(cents),
            kind,
            description: None,
            date,
            category_id,
        })
        .await
        .unwrap();
}

/// Groceries: $100 on Jan 5 and $50 on Jan 20, plus $500 income on Jan 1.
async fn groceries_ledger() -> (Engine, i64) {
    let engine = engine_with_db().await;
    let groceries = category(&engine, "Groceries").await;
    let salary = category(&engine, "Salary").await;
    record(&engine, TransactionKind::Expense, groceries, 100_00, day(2024, 1, 5)).await;
    record(&engine, TransactionKind::Expense, groceries, 50_00, day(2024, 1, 20)).await;
    record(&engine, TransactionKind::Income, salary, 500_00, day(2024, 1, 1)).await;
    (engine, groceries)
}

#[tokio::test]
async fn balance_sums_income_and_expenses() {
    let (engine, _) = groceries_ledger().await;

    let balance = engine.balance(DateFilter::default()).await.unwrap();
    assert_eq!(balance.total_income, Money::new(500_00));
    assert_eq!(balance.total_expenses, Money::new(150_00));
    assert_eq!(balance.net_balance, Money::new(350_00));

    // both bounds are inclusive
    let window = engine
        .balance(DateFilter::between(day(2024, 1, 5), day(2024, 1, 20)))
        .await
        .unwrap();
    assert_eq!(window.total_income, Money::ZERO);
    assert_eq!(window.total_expenses, Money::new(150_00));
    assert_eq!(window.net_balance, Money::new(-150_00));
}

#[tokio::test]
async fn empty_ledger_balances_to_zero() {
    let engine = engine_with_db().await;
    let balance = engine.balance(DateFilter::default()).await.unwrap();
    assert_eq!(balance.total_income, Money::ZERO);
    assert_eq!(balance.total_expenses, Money::ZERO);
    assert_eq!(balance.net_balance, Money::ZERO);

    let spending = engine.spending_by_category(DateFilter::default()).await.unwrap();
    assert!(spending.items.is_empty());
    assert_eq!(spending.total_spending, Money::ZERO);
}

#[tokio::test]
async fn inverted_date_filter_is_rejected() {
    let engine = engine_with_db().await;
    let err = engine
        .balance(DateFilter::between(day(2024, 2, 1), day(2024, 1, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn spending_by_category_ranks_and_splits_percentages() {
    let (engine, groceries) = groceries_ledger().await;

    let spending = engine.spending_by_category(DateFilter::default()).await.unwrap();
    assert_eq!(spending.items.len(), 1);
    assert_eq!(spending.items[0].category_id, groceries);
    assert_eq!(spending.items[0].total, Money::new(150_00));
    assert_eq!(spending.items[0].percentage, 100.0);

    let travel = category(&engine, "Travel").await;
    record(&engine, TransactionKind::Expense, travel, 300_00, day(2024, 1, 10)).await;

    let spending = engine.spending_by_category(DateFilter::default()).await.unwrap();
    let names: Vec<_> = spending
        .items
        .iter()
        .map(|i| i.category_name.as_str())
        .collect();
    assert_eq!(names, ["Travel", "Groceries"]);
    assert_eq!(spending.total_spending, Money::new(450_00));
    assert_eq!(spending.items[0].percentage, 66.67);
    assert_eq!(spending.items[1].percentage, 33.33);
}

#[tokio::test]
async fn monthly_summary_skips_empty_months() {
    let (engine, groceries) = groceries_ledger().await;
    record(&engine, TransactionKind::Expense, groceries, 20_00, day(2024, 3, 31)).await;
    record(&engine, TransactionKind::Expense, groceries, 99_00, day(2023, 12, 31)).await;

    let summary = engine.monthly_summary(2024).await.unwrap();
    assert_eq!(summary.year, 2024);
    let months: Vec<_> = summary.items.iter().map(|m| m.month).collect();
    assert_eq!(months, [1, 3]);
    assert_eq!(summary.items[0].income, Money::new(500_00));
    assert_eq!(summary.items[0].expenses, Money::new(150_00));
    assert_eq!(summary.items[0].net, Money::new(350_00));
    assert_eq!(summary.items[1].net, Money::new(-20_00));

    let err = engine.monthly_summary(0).await.unwrap_err();
    assert_eq!(err.fields()[0].field, "year");
}

#[tokio::test]
async fn budget_detail_reports_usage() {
    let (engine, groceries) = groceries_ledger().await;
    let budget = engine
        .create::<Budget>(BudgetNew {
            name: "Groceries January".to_string(),
            amount: Money::new(200_00),
            start_date: day(2024, 1, 1),
            end_date: day(2024, 1, 31),
            category_id: Some(groceries),
        })
        .await
        .unwrap();

    let detail = engine.budget_detail(budget.id).await.unwrap();
    assert_eq!(detail.budget.id, budget.id);
    assert_eq!(detail.usage.spent, Money::new(150_00));
    assert_eq!(detail.usage.remaining, Money::new(50_00));
    assert_eq!(detail.usage.percentage_used, 75.0);
}

#[tokio::test]
async fn budget_status_covers_active_budgets_only() {
    let (engine, groceries) = groceries_ledger().await;
    for (name, category_id, start, end) in [
        ("Everything", None, day(2024, 1, 1), day(2024, 1, 31)),
        ("Food", Some(groceries), day(2024, 1, 10), day(2024, 2, 10)),
        ("Last year", None, day(2023, 1, 1), day(2023, 12, 31)),
    ] {
        engine
            .create::<Budget>(BudgetNew {
                name: name.to_string(),
                amount: Money::new(100_00),
                start_date: start,
                end_date: end,
                category_id,
            })
            .await
            .unwrap();
    }

    let statuses = engine.budget_status(day(2024, 1, 15)).await.unwrap();
    assert_eq!(statuses.len(), 2);

    let overall = &statuses[0];
    assert_eq!(overall.budget_name, "Everything");
    assert_eq!(overall.category_name, None);
    assert_eq!(overall.usage.spent, Money::new(150_00));
    assert_eq!(overall.usage.remaining, Money::new(-50_00));
    assert_eq!(overall.usage.percentage_used, 150.0);

    let food = &statuses[1];
    assert_eq!(food.category_name.as_deref(), Some("Groceries"));
    // only the Jan 20 expense falls inside Jan 10..Feb 10
    assert_eq!(food.usage.spent, Money::new(50_00));
    assert_eq!(food.usage.percentage_used, 50.0);
}

#[tokio::test]
async fn monthly_trend_without_previous_spending_has_no_percentage() {
    let (engine, _) = groceries_ledger().await;

    let trend = engine
        .trends(TrendPeriod::Monthly, day(2024, 1, 25))
        .await
        .unwrap();
    assert_eq!(trend.current.start, day(2024, 1, 1));
    assert_eq!(trend.previous.start, day(2023, 12, 1));
    assert_eq!(trend.previous.end, day(2023, 12, 31));
    assert_eq!(trend.current_period_spending, Money::new(150_00));
    assert_eq!(trend.previous_period_spending, Money::ZERO);
    assert_eq!(trend.change_amount, Money::new(150_00));
    assert_eq!(trend.change_percentage, None);
}

#[tokio::test]
async fn weekly_trend_compares_with_previous_week() {
    let engine = engine_with_db().await;
    let food = category(&engine, "Food").await;
    // 2024-01-17 is a Wednesday; current week starts Monday 2024-01-15
    record(&engine, TransactionKind::Expense, food, 40_00, day(2024, 1, 9)).await;
    record(&engine, TransactionKind::Expense, food, 30_00, day(2024, 1, 15)).await;
    record(&engine, TransactionKind::Expense, food, 99_00, day(2024, 1, 18)).await;
    record(&engine, TransactionKind::Income, food, 1_000_00, day(2024, 1, 16)).await;

    let trend = engine
        .trends(TrendPeriod::Weekly, day(2024, 1, 17))
        .await
        .unwrap();
    assert_eq!(trend.current.start, day(2024, 1, 15));
    assert_eq!(trend.previous.start, day(2024, 1, 8));
    assert_eq!(trend.current_period_spending, Money::new(30_00));
    assert_eq!(trend.previous_period_spending, Money::new(40_00));
    assert_eq!(trend.change_amount, Money::new(-10_00));
    assert_eq!(trend.change_percentage, Some(-25.0));
}
