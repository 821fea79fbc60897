use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use validator::Validate;

use crate::data::models::{
    BulkReviewRequest, BulkReviewResult, ReviewError, ReviewOutcome, ReviewSubmission,
};
use crate::data::repositories::{CardStore, QuestionStore};
use crate::features::review::submission;
use crate::handlers::study::StudyState;
use crate::utils;

#[axum::debug_handler]
pub async fn submit_card_review(
    State((pool, listeners, config)): State<StudyState>,
    session: tower_sessions::Session,
    Path(card_id): Path<i32>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<Json<ReviewOutcome>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;
    payload.validate().map_err(ReviewError::from)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let outcome = submission::submit_review::<CardStore>(
        &mut conn,
        &listeners,
        &config,
        user_id,
        card_id,
        &payload,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn submit_trivia_review(
    State((pool, listeners, config)): State<StudyState>,
    session: tower_sessions::Session,
    Path(question_id): Path<i32>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<Json<ReviewOutcome>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;
    payload.validate().map_err(ReviewError::from)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let outcome = submission::submit_review::<QuestionStore>(
        &mut conn,
        &listeners,
        &config,
        user_id,
        question_id,
        &payload,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn submit_card_reviews_bulk(
    State((pool, listeners, config)): State<StudyState>,
    session: tower_sessions::Session,
    Json(payload): Json<BulkReviewRequest>,
) -> Result<Json<BulkReviewResult>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let result = submission::submit_reviews_bulk::<CardStore>(
        &mut conn,
        &listeners,
        &config,
        user_id,
        &payload,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn submit_trivia_reviews_bulk(
    State((pool, listeners, config)): State<StudyState>,
    session: tower_sessions::Session,
    Json(payload): Json<BulkReviewRequest>,
) -> Result<Json<BulkReviewResult>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let result = submission::submit_reviews_bulk::<QuestionStore>(
        &mut conn,
        &listeners,
        &config,
        user_id,
        &payload,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(result))
}
