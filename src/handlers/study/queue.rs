use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use validator::Validate;

use crate::data::models::{CardContent, QueueParams, ReviewError, StudyQueue, TriviaContent};
use crate::data::repositories::{CardStore, QuestionStore};
use crate::features::review::{queue, QueueRequest};
use crate::handlers::study::StudyState;
use crate::utils;

#[axum::debug_handler]
pub async fn card_queue(
    State((pool, _listeners, _config)): State<StudyState>,
    session: tower_sessions::Session,
    Query(params): Query<QueueParams>,
) -> Result<Json<StudyQueue<CardContent>>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;
    params.validate().map_err(ReviewError::from)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let request = QueueRequest {
        deck_id: params.deck_id,
        limit: params.limit,
        include_new: params.include_new,
        new_cards_limit: params.new_cards_limit,
    };
    let queue = queue::build_queue::<CardStore>(
        &mut conn,
        user_id,
        &request,
        Utc::now().naive_utc().date(),
    )?;

    Ok(Json(queue))
}

#[axum::debug_handler]
pub async fn trivia_queue(
    State((pool, _listeners, _config)): State<StudyState>,
    session: tower_sessions::Session,
    Query(params): Query<QueueParams>,
) -> Result<Json<StudyQueue<TriviaContent>>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;
    params.validate().map_err(ReviewError::from)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let request = QueueRequest {
        deck_id: params.deck_id,
        limit: params.limit,
        include_new: params.include_new,
        new_cards_limit: params.new_cards_limit,
    };
    let queue = queue::build_queue::<QuestionStore>(
        &mut conn,
        user_id,
        &request,
        Utc::now().naive_utc().date(),
    )?;

    Ok(Json(queue))
}
