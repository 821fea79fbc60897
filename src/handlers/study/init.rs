use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::data::models::{InitializationResult, InitializeItemsRequest, ReviewError};
use crate::data::repositories::{CardStore, QuestionStore};
use crate::features::review::initializer;
use crate::handlers::study::StudyState;
use crate::utils;

#[axum::debug_handler]
pub async fn initialize_cards(
    State((pool, _listeners, _config)): State<StudyState>,
    session: tower_sessions::Session,
    Json(payload): Json<InitializeItemsRequest>,
) -> Result<Json<InitializationResult>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let result = initializer::initialize_items::<CardStore>(
        &mut conn,
        user_id,
        payload.deck_id,
        &payload.item_ids,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn initialize_trivia(
    State((pool, _listeners, _config)): State<StudyState>,
    session: tower_sessions::Session,
    Json(payload): Json<InitializeItemsRequest>,
) -> Result<Json<InitializationResult>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let result = initializer::initialize_items::<QuestionStore>(
        &mut conn,
        user_id,
        payload.deck_id,
        &payload.item_ids,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn initialize_card_deck(
    State((pool, _listeners, _config)): State<StudyState>,
    session: tower_sessions::Session,
    Path(deck_id): Path<i32>,
) -> Result<Json<InitializationResult>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let result = initializer::initialize_deck_for_user::<CardStore>(
        &mut conn,
        user_id,
        deck_id,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn initialize_trivia_deck(
    State((pool, _listeners, _config)): State<StudyState>,
    session: tower_sessions::Session,
    Path(deck_id): Path<i32>,
) -> Result<Json<InitializationResult>, ReviewError> {
    let user_id = utils::get_current_user_id(&session)
        .await
        .ok_or(ReviewError::NotLoggedIn)?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::PoolError(e.to_string())
    })?;

    let result = initializer::initialize_deck_for_user::<QuestionStore>(
        &mut conn,
        user_id,
        deck_id,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(result))
}
