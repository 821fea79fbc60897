use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use diesel::SqliteConnection;

use crate::data::models::{
    DashboardStats, ReviewError, ReviewStatus, StatusBreakdown, StudyStats,
};
use crate::data::repositories::{CardStore, QuestionStore, ReviewableStore};
use crate::features::review::queue::resolve_deck_scope;

/// Dashboard summary for one content type over the requested deck scope.
pub fn collect_stats<S: ReviewableStore>(
    conn: &mut SqliteConnection,
    user_id: i32,
    deck_id: Option<i32>,
    today: NaiveDate,
) -> Result<StudyStats, ReviewError> {
    collect_with_dates::<S>(conn, user_id, deck_id, today).map(|(stats, _)| stats)
}

/// Both content types plus the combined view the dashboard renders.
pub fn dashboard_stats(
    conn: &mut SqliteConnection,
    user_id: i32,
    deck_id: Option<i32>,
    today: NaiveDate,
) -> Result<DashboardStats, ReviewError> {
    let (cards, card_dates) = collect_with_dates::<CardStore>(conn, user_id, deck_id, today)?;
    let (trivia, trivia_dates) = collect_with_dates::<QuestionStore>(conn, user_id, deck_id, today)?;

    // The combined streak runs over review days of either type
    let combined_streak = streak_days(
        card_dates.into_iter().chain(trivia_dates.into_iter()),
        today,
    );
    let combined = combine(&cards, &trivia, combined_streak);

    Ok(DashboardStats {
        cards,
        trivia,
        combined,
    })
}

fn collect_with_dates<S: ReviewableStore>(
    conn: &mut SqliteConnection,
    user_id: i32,
    deck_id: Option<i32>,
    today: NaiveDate,
) -> Result<(StudyStats, Vec<NaiveDate>), ReviewError> {
    let deck_ids = resolve_deck_scope(conn, user_id, deck_id)?;
    if deck_ids.is_empty() {
        return Ok((StudyStats::default(), Vec::new()));
    }

    let mut by_status = StatusBreakdown::default();
    for (status, count) in S::status_counts(conn, user_id, &deck_ids)? {
        match ReviewStatus::parse(&status) {
            Some(ReviewStatus::Learning) => by_status.learning = count,
            Some(ReviewStatus::Review) => by_status.review = count,
            Some(ReviewStatus::Mastered) => by_status.mastered = count,
            // Initialized-but-unreviewed rows count as new below
            _ => {}
        }
    }
    let total_items = S::items_in_scope(conn, &deck_ids)?;
    by_status.new =
        (total_items - by_status.learning - by_status.review - by_status.mastered).max(0);

    let history = S::review_history(conn, user_id, &deck_ids)?;
    let review_dates: Vec<NaiveDate> = history
        .iter()
        .map(|record| record.reviewed_at.date())
        .collect();

    let total_reviews = history.len() as i64;
    let reviews_today = review_dates.iter().filter(|date| **date == today).count() as i64;
    let total_study_time: i64 = history
        .iter()
        .map(|record| record.time_taken_seconds as i64)
        .sum();
    let average_quality = if history.is_empty() {
        0.0
    } else {
        history.iter().map(|record| record.quality as f64).sum::<f64>() / total_reviews as f64
    };
    let current_streak = streak_days(review_dates.iter().copied(), today);
    let due_today = S::due_count(conn, user_id, &deck_ids, today)?;

    let stats = StudyStats {
        by_status,
        due_today,
        reviews_today,
        total_reviews,
        total_study_time,
        average_quality,
        current_streak,
    };
    Ok((stats, review_dates))
}

/// Consecutive calendar days with at least one review, ending today or
/// yesterday. A day without reviews before that breaks the chain.
pub fn streak_days(dates: impl Iterator<Item = NaiveDate>, today: NaiveDate) -> i64 {
    let days: HashSet<NaiveDate> = dates.collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

fn combine(cards: &StudyStats, trivia: &StudyStats, current_streak: i64) -> StudyStats {
    let total_reviews = cards.total_reviews + trivia.total_reviews;
    let average_quality = if total_reviews == 0 {
        0.0
    } else {
        (cards.average_quality * cards.total_reviews as f64
            + trivia.average_quality * trivia.total_reviews as f64)
            / total_reviews as f64
    };

    StudyStats {
        by_status: StatusBreakdown {
            new: cards.by_status.new + trivia.by_status.new,
            learning: cards.by_status.learning + trivia.by_status.learning,
            review: cards.by_status.review + trivia.by_status.review,
            mastered: cards.by_status.mastered + trivia.by_status.mastered,
        },
        due_today: cards.due_today + trivia.due_today,
        reviews_today: cards.reviews_today + trivia.reviews_today,
        total_reviews,
        total_study_time: cards.total_study_time + trivia.total_study_time,
        average_quality,
        current_streak,
    }
}
