//! Transactions API endpoints.

use api_types::transaction::{
    TransactionCreate, TransactionListQuery, TransactionListResponse, TransactionUpdate,
    TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::Transaction;

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<TransactionListQuery>, ServerError>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let page = state
        .engine
        .list_transactions(&query.filter(), query.page())
        .await?;
    Ok(Json(page.into()))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionCreate>, ServerError>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let transaction = state.engine.create::<Transaction>(payload.into()).await?;
    tracing::info!(
        transaction_id = transaction.id,
        category_id = transaction.category_id,
        kind = transaction.kind.as_str(),
        "transaction created"
    );
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<TransactionView>, ServerError> {
    let transaction = state.engine.get::<Transaction>(id).await?;
    Ok(Json(transaction.into()))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionUpdate>, ServerError>,
) -> Result<Json<TransactionView>, ServerError> {
    let transaction = state
        .engine
        .update::<Transaction>(id, payload.into())
        .await?;
    tracing::info!(transaction_id = id, "transaction updated");
    Ok(Json(transaction.into()))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete::<Transaction>(id).await?;
    tracing::info!(transaction_id = id, "transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}
