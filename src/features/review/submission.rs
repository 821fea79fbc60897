use chrono::NaiveDateTime;
use diesel::{Connection, SqliteConnection};

use crate::data::models::{
    BulkItemResult, BulkReviewRequest, BulkReviewResult, ReviewError, ReviewOutcome, ReviewRecord,
    ReviewStatus, ReviewSubmission, ReviewableStatistic,
};
use crate::data::repositories::{DeckRepository, ProgressRepository, ReviewableStore};
use crate::features::review::algorithm::{self, SrsConfig};
use crate::features::review::events::{ItemMastered, ReviewApplied, ReviewListeners};

/// Applies one review inside a single transaction: read current state, run
/// the SM-2 update, write the new state and the history record. Listeners
/// fire only after the transaction commits.
pub fn submit_review<S: ReviewableStore>(
    conn: &mut SqliteConnection,
    listeners: &ReviewListeners,
    config: &SrsConfig,
    user_id: i32,
    item_id: i32,
    submission: &ReviewSubmission,
    now: NaiveDateTime,
) -> Result<ReviewOutcome, ReviewError> {
    if !(0..=5).contains(&submission.quality) {
        return Err(ReviewError::Validation(format!(
            "quality must be between 0 and 5, got {}",
            submission.quality
        )));
    }

    if let Some(deck_id) = submission.deck_id {
        if !DeckRepository::deck_exists(conn, user_id, deck_id)? {
            return Err(ReviewError::NotFound("Deck not found".into()));
        }
    }

    let (previous_status, statistic, record) = conn.transaction::<_, ReviewError, _>(|conn| {
        if !S::item_exists(conn, item_id)? {
            return Err(ReviewError::NotFound("Item not found".into()));
        }

        // Items never initialized are picked up lazily on their first review
        let previous = match S::find_statistic(conn, user_id, item_id)? {
            Some(statistic) => statistic,
            None => ReviewableStatistic::baseline(user_id, item_id, now),
        };
        let previous_status = previous.status;

        let updated = algorithm::apply_review(&previous, submission.quality, now, config)?;
        S::save_statistic(conn, &updated)?;

        let record = ReviewRecord {
            item_id,
            quality: submission.quality,
            time_taken_seconds: submission.time_taken_seconds,
            reviewed_at: now,
        };
        S::append_review(conn, user_id, &record)?;

        if let Some(deck_id) = submission.deck_id {
            ProgressRepository::record_reviews(conn, user_id, deck_id, 1, now)?;
        }

        Ok((previous_status, updated, record))
    })?;

    listeners.review_applied(&ReviewApplied {
        kind: S::KIND,
        user_id,
        item_id,
        quality: record.quality,
        status: statistic.status,
    });
    if statistic.status == ReviewStatus::Mastered && previous_status != ReviewStatus::Mastered {
        listeners.item_mastered(&ItemMastered {
            kind: S::KIND,
            user_id,
            item_id,
        });
    }

    Ok(ReviewOutcome { statistic, record })
}

/// Processes a study session batch item by item. A bad item is reported in
/// its slot and the rest of the batch continues; only a failing store aborts.
pub fn submit_reviews_bulk<S: ReviewableStore>(
    conn: &mut SqliteConnection,
    listeners: &ReviewListeners,
    config: &SrsConfig,
    user_id: i32,
    request: &BulkReviewRequest,
    now: NaiveDateTime,
) -> Result<BulkReviewResult, ReviewError> {
    if !DeckRepository::deck_exists(conn, user_id, request.deck_id)? {
        return Err(ReviewError::NotFound("Deck not found".into()));
    }

    let mut results = Vec::with_capacity(request.reviews.len());
    let mut successful_count = 0;

    for item in &request.reviews {
        let submission = ReviewSubmission {
            quality: item.quality,
            time_taken_seconds: item.time_taken_seconds,
            deck_id: None,
        };

        match submit_review::<S>(
            conn,
            listeners,
            config,
            user_id,
            item.item_id,
            &submission,
            now,
        ) {
            Ok(outcome) => {
                successful_count += 1;
                results.push(BulkItemResult {
                    item_id: item.item_id,
                    success: true,
                    error: None,
                    status: Some(outcome.statistic.status),
                    next_review: Some(outcome.statistic.next_review_date),
                });
            }
            // A store that stopped answering poisons the whole batch
            Err(ReviewError::DatabaseError(err)) => return Err(ReviewError::DatabaseError(err)),
            Err(err) => {
                log::warn!(
                    "bulk review: {} {} failed for user {}: {}",
                    S::KIND,
                    item.item_id,
                    user_id,
                    err
                );
                results.push(BulkItemResult {
                    item_id: item.item_id,
                    success: false,
                    error: Some(err.to_string()),
                    status: None,
                    next_review: None,
                });
            }
        }
    }

    if successful_count > 0 {
        ProgressRepository::record_reviews(
            conn,
            user_id,
            request.deck_id,
            successful_count as i32,
            now,
        )?;
    }

    if let Some(session_id) = &request.session_id {
        log::info!(
            "session {}: user {} reviewed {} {}s, {} failed",
            session_id,
            user_id,
            successful_count,
            S::KIND,
            results.len() - successful_count
        );
    }

    Ok(BulkReviewResult {
        successful_count,
        failed_count: results.len() - successful_count,
        results,
    })
}
