use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::handlers::bookings::DateQuery;
use crate::repository::BookingRepository;
use crate::services::stats::{self, DailyStats, HourBucket, StatusCount};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub daily: DailyStats,
    pub status_distribution: Vec<StatusCount>,
    pub hourly_activity: Vec<HourBucket>,
}

// GET /api/stats?date=YYYY-MM-DD — defaults to the selected day.
pub async fn daily_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let (bookings, space_count) = {
        let planner = state.planner.lock().await;
        match query.date {
            Some(date) if date != planner.selected_date() => {
                let repo = planner.repo();
                let space_count = planner.spaces().len();
                drop(planner);
                (repo.bookings_on(&date).await?, space_count)
            }
            _ => (planner.bookings().to_vec(), planner.spaces().len()),
        }
    };

    Ok(Json(StatsResponse {
        daily: stats::daily_stats(&bookings, space_count),
        status_distribution: stats::status_distribution(&bookings),
        hourly_activity: stats::hourly_activity(&bookings),
    }))
}
