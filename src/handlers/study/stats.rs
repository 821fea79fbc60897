use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;

use crate::data::models::{DashboardStats, ReviewError, StatsParams};
use crate::features::review::stats;
use crate::handlers::study::StudyState;
use crate::utils;

#[axum::debug_handler]
pub async fn study_stats(
    State((pool, _listeners, _config)): State<StudyState>,
    session: tower_sessions::Session,
    Query(params): Query<StatsParams>,
) -> Result<Json<DashboardStats>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let dashboard = stats::dashboard_stats(
        &mut conn,
        user_id,
        params.deck_id,
        Utc::now().naive_utc().date(),
    )?;

    Ok(Json(dashboard))
}
