use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::features::review::{ReviewListeners, SrsConfig};
use crate::DbPool;

pub mod init;
pub mod queue;
pub mod review;
pub mod stats;

pub type StudyState = (DbPool, Arc<ReviewListeners>, SrsConfig);

pub fn study_router(pool: DbPool, listeners: Arc<ReviewListeners>, config: SrsConfig) -> Router {
    Router::new()
        .route("/cards/queue", get(queue::card_queue))
        .route("/trivia/queue", get(queue::trivia_queue))
        .route("/cards/{card_id}/review", post(review::submit_card_review))
        .route(
            "/trivia/{question_id}/review",
            post(review::submit_trivia_review),
        )
        .route(
            "/cards/reviews/bulk",
            post(review::submit_card_reviews_bulk),
        )
        .route(
            "/trivia/reviews/bulk",
            post(review::submit_trivia_reviews_bulk),
        )
        .route("/cards/initialize", post(init::initialize_cards))
        .route("/trivia/initialize", post(init::initialize_trivia))
        .route(
            "/cards/decks/{deck_id}/initialize",
            post(init::initialize_card_deck),
        )
        .route(
            "/trivia/decks/{deck_id}/initialize",
            post(init::initialize_trivia_deck),
        )
        .route("/stats", get(stats::study_stats))
        .with_state((pool, listeners, config))
}
