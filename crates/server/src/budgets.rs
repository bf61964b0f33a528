//! Budgets API endpoints.

use api_types::budget::{BudgetCreate, BudgetDetailView, BudgetUpdate, BudgetView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::Budget;

use crate::{ServerError, server::ServerState};

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let budgets = state
        .engine
        .list::<Budget>()
        .await?
        .into_iter()
        .map(BudgetView::from)
        .collect();
    Ok(Json(budgets))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetCreate>, ServerError>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state.engine.create::<Budget>(payload.into()).await?;
    tracing::info!(budget_id = budget.id, "budget created");
    Ok((StatusCode::CREATED, Json(budget.into())))
}

/// The budget plus its spending so far.
pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<BudgetDetailView>, ServerError> {
    let detail = state.engine.budget_detail(id).await?;
    Ok(Json(detail.into()))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetUpdate>, ServerError>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.update::<Budget>(id, payload.into()).await?;
    tracing::info!(budget_id = id, "budget updated");
    Ok(Json(budget.into()))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete::<Budget>(id).await?;
    tracing::info!(budget_id = id, "budget deleted");
    Ok(StatusCode::NO_CONTENT)
}
