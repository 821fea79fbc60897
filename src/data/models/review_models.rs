use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::srs_models::{ReviewRecord, ReviewStatus, ReviewableStatistic};

// Errors shared by every study endpoint
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Database error")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("Connection pool error: {0}")]
    PoolError(String),
}

/// Payload for a single submitted review.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewSubmission {
    #[validate(range(min = 0, max = 5, message = "quality must be between 0 and 5"))]
    pub quality: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "time taken cannot be negative"))]
    pub time_taken_seconds: i32,
    pub deck_id: Option<i32>,
}

#[derive(Serialize)]
pub struct ReviewOutcome {
    pub statistic: ReviewableStatistic,
    pub record: ReviewRecord,
}

/// One entry of a bulk submission; validated per item, not per request.
#[derive(Debug, Deserialize)]
pub struct BulkReviewItem {
    pub item_id: i32,
    pub quality: i32,
    #[serde(default)]
    pub time_taken_seconds: i32,
}

#[derive(Debug, Deserialize)]
pub struct BulkReviewRequest {
    pub deck_id: i32,
    pub session_id: Option<String>,
    pub reviews: Vec<BulkReviewItem>,
}

#[derive(Serialize)]
pub struct BulkItemResult {
    pub item_id: i32,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct BulkReviewResult {
    pub successful_count: usize,
    pub failed_count: usize,
    pub results: Vec<BulkItemResult>,
}

/// Query parameters accepted by the queue endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct QueueParams {
    pub deck_id: Option<i32>,
    #[serde(default = "default_queue_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
    #[serde(default = "default_include_new")]
    pub include_new: bool,
    #[serde(default = "default_new_cards_limit")]
    #[validate(range(min = 0, max = 100, message = "new card limit must be between 0 and 100"))]
    pub new_cards_limit: i64,
}

fn default_queue_limit() -> i64 {
    20
}

fn default_include_new() -> bool {
    true
}

fn default_new_cards_limit() -> i64 {
    10
}

#[derive(Serialize)]
pub struct StudyQueueEntry<C> {
    pub item_id: i32,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<NaiveDate>,
    pub content: C,
}

#[derive(Serialize)]
pub struct StudyQueue<C> {
    pub entries: Vec<StudyQueueEntry<C>>,
    pub due_count: usize,
    pub new_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct InitializeItemsRequest {
    pub deck_id: i32,
    pub item_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct InitializationResult {
    pub initialized_count: usize,
    pub already_exists_count: usize,
    pub item_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub deck_id: Option<i32>,
}

#[derive(Debug, Default, Serialize)]
pub struct StatusBreakdown {
    pub new: i64,
    pub learning: i64,
    pub review: i64,
    pub mastered: i64,
}

/// Dashboard summary for one content type (or the combined view).
#[derive(Debug, Default, Serialize)]
pub struct StudyStats {
    pub by_status: StatusBreakdown,
    pub due_today: i64,
    pub reviews_today: i64,
    pub total_reviews: i64,
    pub total_study_time: i64,
    pub average_quality: f64,
    pub current_streak: i64,
}

#[derive(Serialize)]
pub struct DashboardStats {
    pub cards: StudyStats,
    pub trivia: StudyStats,
    pub combined: StudyStats,
}
