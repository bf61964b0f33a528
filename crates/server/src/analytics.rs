//! Read-only reports. "Today" is the server's local calendar date.

use api_types::analytics::{
    BalanceView, BudgetStatusResponse, DateRangeQuery, MonthlySummaryQuery, MonthlySummaryView,
    SpendingByCategoryView, TrendView, TrendsQuery,
};
use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use chrono::{Datelike, Local, NaiveDate};

use crate::{ServerError, server::ServerState};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn balance(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<DateRangeQuery>, ServerError>,
) -> Result<Json<BalanceView>, ServerError> {
    let balance = state.engine.balance(query.into()).await?;
    Ok(Json(balance.into()))
}

pub async fn spending_by_category(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<DateRangeQuery>, ServerError>,
) -> Result<Json<SpendingByCategoryView>, ServerError> {
    let spending = state.engine.spending_by_category(query.into()).await?;
    Ok(Json(spending.into()))
}

pub async fn monthly_summary(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<MonthlySummaryQuery>, ServerError>,
) -> Result<Json<MonthlySummaryView>, ServerError> {
    let year = query.year.unwrap_or_else(|| today().year());
    let summary = state.engine.monthly_summary(year).await?;
    Ok(Json(summary.into()))
}

pub async fn budget_status(
    State(state): State<ServerState>,
) -> Result<Json<BudgetStatusResponse>, ServerError> {
    let statuses = state.engine.budget_status(today()).await?;
    Ok(Json(statuses.into_iter().collect()))
}

pub async fn trends(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<TrendsQuery>, ServerError>,
) -> Result<Json<TrendView>, ServerError> {
    let period = query.period.unwrap_or_default();
    let trend = state.engine.trends(period, today()).await?;
    Ok(Json(trend.into()))
}
