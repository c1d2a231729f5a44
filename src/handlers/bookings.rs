use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Booking, BookingDraft};
use crate::repository::BookingRepository;
use crate::services::capacity::{self, CandidateSlot};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

fn check_date_shape(date: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("date must be YYYY-MM-DD, got {date:?}")))
}

// GET /api/bookings?date=YYYY-MM-DD
//
// Selecting a date switches the planner's working day. The fetch runs
// outside the planner lock; a stale completion is discarded by its token.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let date = match query.date {
        Some(date) => {
            check_date_shape(&date)?;
            date
        }
        None => state.planner.lock().await.selected_date().to_string(),
    };

    let (ticket, repo) = {
        let mut planner = state.planner.lock().await;
        (planner.begin_fetch(&date), planner.repo())
    };

    let fetched = repo.bookings_on(&date).await?;

    let mut planner = state.planner.lock().await;
    planner.complete_fetch(&ticket, fetched.clone());
    Ok(Json(fetched))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<Booking>, AppError> {
    draft.validate().map_err(AppError::Validation)?;

    let mut planner = state.planner.lock().await;
    if planner.space(&draft.space_id).is_none() {
        return Err(AppError::NotFound(format!("space {}", draft.space_id)));
    }
    let saved = planner.submit_booking(draft, None).await?;
    Ok(Json(saved))
}

// PUT /api/bookings/:id — full replace.
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<Booking>, AppError> {
    draft.validate().map_err(AppError::Validation)?;

    let mut planner = state.planner.lock().await;
    if planner.space(&draft.space_id).is_none() {
        return Err(AppError::NotFound(format!("space {}", draft.space_id)));
    }
    let saved = planner.submit_booking(draft, Some(&id)).await?;
    Ok(Json(saved))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut planner = state.planner.lock().await;
    planner.delete_booking(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/bookings/preview

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub slot: CandidateSlot,
    /// Id of the booking being edited, so it cannot conflict with itself.
    #[serde(default)]
    pub exclude_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityPreview {
    pub current_load: i32,
    pub max: i32,
    pub remaining: i32,
    pub is_over: bool,
    pub overlapping: Vec<String>,
}

/// The booking form's live capacity check. Advisory only: an over-capacity
/// result never prevents the subsequent submit.
pub async fn preview_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<CapacityPreview>, AppError> {
    check_date_shape(&req.slot.date)?;

    let (capacity, local) = {
        let planner = state.planner.lock().await;
        let capacity = planner
            .space(&req.slot.space_id)
            .map(|s| s.capacity)
            .ok_or_else(|| AppError::NotFound(format!("space {}", req.slot.space_id)))?;
        if req.slot.date == planner.selected_date() {
            (capacity, Some(planner.bookings().to_vec()))
        } else {
            (capacity, None)
        }
    };

    let existing = match local {
        Some(bookings) => bookings,
        None => {
            let repo = state.planner.lock().await.repo();
            repo.bookings_on(&req.slot.date).await?
        }
    };

    let report = capacity::assess_load(capacity, &req.slot, req.exclude_id.as_deref(), &existing)?;

    Ok(Json(CapacityPreview {
        current_load: report.current_load,
        max: capacity,
        remaining: report.remaining_capacity,
        is_over: report.is_over_capacity,
        overlapping: report.overlapping.iter().map(|b| b.id.clone()).collect(),
    }))
}
