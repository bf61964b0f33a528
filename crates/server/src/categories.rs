//! Categories API endpoints.

use api_types::category::{CategoryCreate, CategoryUpdate, CategoryView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::Category;

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .list::<Category>()
        .await?
        .into_iter()
        .map(CategoryView::from)
        .collect();
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryCreate>, ServerError>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state.engine.create::<Category>(payload.into()).await?;
    tracing::info!(category_id = category.id, "category created");
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.get::<Category>(id).await?;
    Ok(Json(category.into()))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryUpdate>, ServerError>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.update::<Category>(id, payload.into()).await?;
    tracing::info!(category_id = id, "category updated");
    Ok(Json(category.into()))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete::<Category>(id).await?;
    tracing::info!(category_id = id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}
