use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::models::{Space, SpaceDraft};
use crate::state::AppState;

// GET /api/spaces
pub async fn list_spaces(State(state): State<Arc<AppState>>) -> Json<Vec<Space>> {
    let planner = state.planner.lock().await;
    Json(planner.spaces().to_vec())
}

// POST /api/spaces
pub async fn create_space(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<SpaceDraft>,
) -> Result<Json<Space>, AppError> {
    draft.validate().map_err(AppError::Validation)?;

    let mut planner = state.planner.lock().await;
    let space = planner.add_space(draft).await?;
    Ok(Json(space))
}

// PUT /api/spaces/:id
pub async fn update_space(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<SpaceDraft>,
) -> Result<Json<Space>, AppError> {
    draft.validate().map_err(AppError::Validation)?;

    let space = draft.into_space(id);
    let mut planner = state.planner.lock().await;
    planner.update_space(space.clone()).await?;
    Ok(Json(space))
}

// DELETE /api/spaces/:id
pub async fn delete_space(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut planner = state.planner.lock().await;
    planner.delete_space(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
