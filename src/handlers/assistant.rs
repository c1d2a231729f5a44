use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::assistant;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SuggestRequest {
    pub request: String,
}

#[derive(Serialize)]
pub struct AssistantReply {
    pub reply: String,
}

// POST /api/assistant/suggest — never fails; provider errors become the
// fixed fallback text.
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestRequest>,
) -> Json<AssistantReply> {
    let (spaces, bookings) = {
        let planner = state.planner.lock().await;
        (planner.spaces().to_vec(), planner.bookings().to_vec())
    };

    let reply =
        assistant::suggest_slot(state.llm.as_ref(), &req.request, &spaces, &bookings).await;
    Json(AssistantReply { reply })
}

// GET /api/assistant/summary
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<AssistantReply> {
    let bookings = {
        let planner = state.planner.lock().await;
        planner.bookings().to_vec()
    };

    let reply = assistant::summarize_load(state.llm.as_ref(), &bookings).await;
    Json(AssistantReply { reply })
}
