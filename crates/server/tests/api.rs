use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Days, Local};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(engine)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Groceries with $100 + $50 of January expenses and a $500 salary.
async fn seeded() -> (Router, i64) {
    let app = app().await;
    let (status, groceries) = send(
        &app,
        "POST",
        "/api/categories/",
        Some(json!({"name": "Groceries", "description": "food"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let groceries = groceries["id"].as_i64().unwrap();

    let (_, salary) = send(&app, "POST", "/api/categories", Some(json!({"name": "Salary"}))).await;
    let salary = salary["id"].as_i64().unwrap();

    for (amount, kind, date, category) in [
        ("100.00", "expense", "2024-01-05", groceries),
        ("50", "expense", "2024-01-20", groceries),
        ("500.00", "income", "2024-01-01", salary),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/transactions/",
            Some(json!({"amount": amount, "type": kind, "date": date, "category_id": category})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    (app, groceries)
}

#[tokio::test]
async fn category_crud_round_trip() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/categories/",
        Some(json!({"name": " Rent ", "description": "monthly"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Rent");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/categories/{id}"),
        Some(json!({"description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Rent");
    assert_eq!(updated["description"], Value::Null);

    let (status, list) = send(&app, "GET", "/api/categories/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/api/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", &format!("/api/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Category with id {id} not found"));
}

#[tokio::test]
async fn duplicate_category_is_a_conflict() {
    let app = app().await;
    send(&app, "POST", "/api/categories/", Some(json!({"name": "Fun"}))).await;
    let (status, body) = send(&app, "POST", "/api/categories/", Some(json!({"name": "Fun"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "\"Fun\" already present!");
}

#[tokio::test]
async fn referenced_category_cannot_be_deleted() {
    let (app, groceries) = seeded().await;
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/categories/{groceries}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("2 transaction(s)"));
}

#[tokio::test]
async fn invalid_input_is_unprocessable() {
    let (app, groceries) = seeded().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions/",
        Some(json!({"amount": "0", "type": "expense", "date": "2024-01-05", "category_id": groceries})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "amount");

    // three decimals and an unknown kind never reach the engine
    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions/",
        Some(json!({"amount": "1.005", "type": "expense", "date": "2024-01-05", "category_id": groceries})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "amount");

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions/",
        Some(json!({"amount": "1.00", "type": "gift", "date": "2024-01-05", "category_id": groceries})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "type");

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions/",
        Some(json!({"amount": "10000000000.00", "type": "expense", "date": "2024-01-05", "category_id": groceries})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "amount");

    let (status, body) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(json!({"name": "Jan", "amount": "10", "start_date": "2024-01-31", "end_date": "2024-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "end_date");

    let (status, _) = send(&app, "GET", "/api/transactions/?per_page=500", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/api/transactions/?type=gift", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/api/categories/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn transaction_list_is_paged_and_filtered() {
    let (app, groceries) = seeded().await;

    let (status, page) = send(
        &app,
        "GET",
        &format!("/api/transactions/?category_id={groceries}&per_page=1&page=2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["page"], 2);
    assert_eq!(page["per_page"], 1);
    assert_eq!(page["items"][0]["date"], "2024-01-05");
    assert_eq!(page["items"][0]["amount"], "100.00");
    assert_eq!(page["items"][0]["type"], "expense");

    let (_, income) = send(&app, "GET", "/api/transactions?type=income", None).await;
    assert_eq!(income["total"], 1);
    assert_eq!(income["items"][0]["amount"], "500.00");
}

#[tokio::test]
async fn analytics_follow_the_ledger() {
    let (app, groceries) = seeded().await;

    let (status, balance) = send(&app, "GET", "/api/analytics/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["total_income"], "500.00");
    assert_eq!(balance["total_expenses"], "150.00");
    assert_eq!(balance["net_balance"], "350.00");

    let (_, spending) = send(
        &app,
        "GET",
        "/api/analytics/spending-by-category?start_date=2024-01-01&end_date=2024-01-31",
        None,
    )
    .await;
    assert_eq!(spending["items"][0]["category_id"], groceries);
    assert_eq!(spending["items"][0]["total"], "150.00");
    assert_eq!(spending["items"][0]["percentage"], 100.0);

    let (_, summary) = send(&app, "GET", "/api/analytics/monthly-summary?year=2024", None).await;
    assert_eq!(summary["year"], 2024);
    assert_eq!(summary["items"][0]["year"], 2024);
    assert_eq!(summary["items"][0]["month"], 1);
    assert_eq!(summary["items"][0]["net"], "350.00");

    let (status, trend) = send(&app, "GET", "/api/analytics/trends?period=weekly", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trend["period"], "weekly");

    let (status, _) = send(&app, "GET", "/api/analytics/trends?period=daily", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "GET",
        "/api/analytics/balance?start_date=2024-02-01&end_date=2024-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn budget_detail_and_status() {
    let (app, groceries) = seeded().await;

    let (status, budget) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(json!({
            "name": "Groceries January",
            "amount": "200.00",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "category_id": groceries
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = budget["id"].as_i64().unwrap();

    let (status, detail) = send(&app, "GET", &format!("/api/budgets/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Groceries January");
    assert_eq!(detail["spent"], "150.00");
    assert_eq!(detail["remaining"], "50.00");
    assert_eq!(detail["percentage_used"], 75.0);

    // a budget from 2024 is not active today
    let (status, statuses) = send(&app, "GET", "/api/analytics/budget-status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(statuses["items"].as_array().unwrap().is_empty());

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/budgets/{id}"),
        Some(json!({"category_id": null, "amount": 300})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category_id"], Value::Null);
    assert_eq!(updated["amount"], "300.00");

    let (status, _) = send(&app, "DELETE", &format!("/api/budgets/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn current_budgets_and_trends_use_todays_date() {
    let app = app().await;
    let today = Local::now().date_naive();
    let yesterday = today - Days::new(1);
    let tomorrow = today + Days::new(1);
    // always inside the previous weekly window
    let week_ago = today - Days::new(7);

    let (_, groceries) = send(&app, "POST", "/api/categories/", Some(json!({"name": "Groceries"}))).await;
    let groceries = groceries["id"].as_i64().unwrap();

    for (amount, date) in [("30.00", today), ("20.00", week_ago)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/transactions/",
            Some(json!({
                "amount": amount,
                "type": "expense",
                "date": date.to_string(),
                "category_id": groceries
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(json!({
            "name": "This week",
            "amount": "120.00",
            "start_date": yesterday.to_string(),
            "end_date": tomorrow.to_string(),
            "category_id": groceries
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, statuses) = send(&app, "GET", "/api/analytics/budget-status", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = statuses["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["budget_name"], "This week");
    assert_eq!(items[0]["category_name"], "Groceries");
    assert_eq!(items[0]["spent"], "30.00");
    assert_eq!(items[0]["remaining"], "90.00");
    assert_eq!(items[0]["percentage_used"], 25.0);

    let (status, trend) = send(&app, "GET", "/api/analytics/trends?period=weekly", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trend["current_end"], today.to_string());
    assert_eq!(trend["current_period_spending"], "30.00");
    assert_eq!(trend["previous_period_spending"], "20.00");
    assert_eq!(trend["change_amount"], "10.00");
    assert_eq!(trend["change_percentage"], 50.0);
}
