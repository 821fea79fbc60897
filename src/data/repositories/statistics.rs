use chrono::NaiveDate;
use diesel::dsl::{count_distinct, count_star, exists};
use diesel::prelude::*;
use diesel::select;
use serde::Serialize;

use crate::data::models::{
    CardContent, CardStatisticRow, NewCardReview, NewCardStatistic, NewQuestionReview,
    NewQuestionStatistic, QuestionStatisticRow, ReviewRecord, ReviewStatus, ReviewableStatistic,
    TriviaContent,
};
use crate::schema::{
    card_reviews, card_statistics, cards, deck_cards, question_reviews, question_statistics,
    trivia_questions,
};

/// Storage boundary the scheduling engine runs against. Both content types
/// implement the same contract over their own statistics and history tables.
pub trait ReviewableStore {
    /// Presentation payload attached to queue entries.
    type Content: Serialize;

    /// Kind tag used in events and log lines.
    const KIND: &'static str;

    fn find_statistic(
        conn: &mut SqliteConnection,
        user_id: i32,
        item_id: i32,
    ) -> QueryResult<Option<ReviewableStatistic>>;

    /// Inserts or replaces the scheduling state for (user, item).
    fn save_statistic(conn: &mut SqliteConnection, stat: &ReviewableStatistic) -> QueryResult<()>;

    /// Of the given ids, the ones that already have a statistics row.
    fn initialized_item_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
        item_ids: &[i32],
    ) -> QueryResult<Vec<i32>>;

    /// Inserts baseline rows one by one, skipping ids another request already
    /// claimed; returns how many rows were actually created.
    fn insert_baselines(
        conn: &mut SqliteConnection,
        stats: &[ReviewableStatistic],
    ) -> QueryResult<usize>;

    fn append_review(
        conn: &mut SqliteConnection,
        user_id: i32,
        record: &ReviewRecord,
    ) -> QueryResult<()>;

    fn item_exists(conn: &mut SqliteConnection, item_id: i32) -> QueryResult<bool>;

    fn list_active_item_ids(conn: &mut SqliteConnection, deck_id: i32) -> QueryResult<Vec<i32>>;

    /// Items whose review date has arrived, most overdue first, item id as
    /// tie-break. Rows still in NEW state are not due; they queue as new items.
    fn due_statistics(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        today: NaiveDate,
        limit: i64,
    ) -> QueryResult<Vec<ReviewableStatistic>>;

    fn due_count(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        today: NaiveDate,
    ) -> QueryResult<i64>;

    /// Active items in scope the user has not started yet (no statistics row,
    /// or one still in NEW state), ordered by item id.
    fn unseen_item_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        limit: i64,
    ) -> QueryResult<Vec<i32>>;

    fn load_content(
        conn: &mut SqliteConnection,
        item_ids: &[i32],
    ) -> QueryResult<Vec<(i32, Self::Content)>>;

    fn status_counts(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
    ) -> QueryResult<Vec<(String, i64)>>;

    fn items_in_scope(conn: &mut SqliteConnection, deck_ids: &[i32]) -> QueryResult<i64>;

    fn review_history(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
    ) -> QueryResult<Vec<ReviewRecord>>;
}

/// Statistics store adapter for vocabulary cards.
pub struct CardStore;

impl ReviewableStore for CardStore {
    type Content = CardContent;

    const KIND: &'static str = "card";

    fn find_statistic(
        conn: &mut SqliteConnection,
        user_id: i32,
        item_id: i32,
    ) -> QueryResult<Option<ReviewableStatistic>> {
        let row = card_statistics::table
            .filter(card_statistics::user_id.eq(user_id))
            .filter(card_statistics::card_id.eq(item_id))
            .first::<CardStatisticRow>(conn)
            .optional()?;

        match row {
            Some(row) => row.into_domain().map(Some),
            None => Ok(None),
        }
    }

    fn save_statistic(conn: &mut SqliteConnection, stat: &ReviewableStatistic) -> QueryResult<()> {
        diesel::insert_into(card_statistics::table)
            .values(NewCardStatistic::from_domain(stat))
            .on_conflict((card_statistics::user_id, card_statistics::card_id))
            .do_update()
            .set((
                card_statistics::status.eq(stat.status.as_str()),
                card_statistics::easiness_factor.eq(stat.easiness_factor),
                card_statistics::interval.eq(stat.interval),
                card_statistics::repetitions.eq(stat.repetitions),
                card_statistics::next_review_date.eq(stat.next_review_date),
                card_statistics::updated_at.eq(stat.updated_at),
            ))
            .execute(conn)?;

        Ok(())
    }

    fn initialized_item_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
        item_ids: &[i32],
    ) -> QueryResult<Vec<i32>> {
        card_statistics::table
            .filter(card_statistics::user_id.eq(user_id))
            .filter(card_statistics::card_id.eq_any(item_ids))
            .select(card_statistics::card_id)
            .load(conn)
    }

    fn insert_baselines(
        conn: &mut SqliteConnection,
        stats: &[ReviewableStatistic],
    ) -> QueryResult<usize> {
        let mut inserted = 0;
        for stat in stats {
            // Duplicate rows from a concurrent initialization are skipped, not errors
            inserted += diesel::insert_into(card_statistics::table)
                .values(NewCardStatistic::from_domain(stat))
                .on_conflict((card_statistics::user_id, card_statistics::card_id))
                .do_nothing()
                .execute(conn)?;
        }
        Ok(inserted)
    }

    fn append_review(
        conn: &mut SqliteConnection,
        user_id: i32,
        record: &ReviewRecord,
    ) -> QueryResult<()> {
        diesel::insert_into(card_reviews::table)
            .values(NewCardReview {
                user_id,
                card_id: record.item_id,
                quality: record.quality,
                time_taken_seconds: record.time_taken_seconds,
                reviewed_at: record.reviewed_at,
            })
            .execute(conn)?;

        Ok(())
    }

    fn item_exists(conn: &mut SqliteConnection, item_id: i32) -> QueryResult<bool> {
        select(exists(
            cards::table
                .filter(cards::card_id.eq(item_id))
                .filter(cards::is_active.eq(true)),
        ))
        .get_result(conn)
    }

    fn list_active_item_ids(conn: &mut SqliteConnection, deck_id: i32) -> QueryResult<Vec<i32>> {
        deck_cards::table
            .inner_join(cards::table)
            .filter(deck_cards::deck_id.eq(deck_id))
            .filter(cards::is_active.eq(true))
            .select(deck_cards::card_id)
            .order(deck_cards::card_id.asc())
            .load(conn)
    }

    fn due_statistics(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        today: NaiveDate,
        limit: i64,
    ) -> QueryResult<Vec<ReviewableStatistic>> {
        let scoped_cards = deck_cards::table
            .filter(deck_cards::deck_id.eq_any(deck_ids))
            .select(deck_cards::card_id);

        card_statistics::table
            .filter(card_statistics::user_id.eq(user_id))
            .filter(card_statistics::status.ne(ReviewStatus::New.as_str()))
            .filter(card_statistics::next_review_date.le(today))
            .filter(card_statistics::card_id.eq_any(scoped_cards))
            .order((
                card_statistics::next_review_date.asc(),
                card_statistics::card_id.asc(),
            ))
            .limit(limit)
            .load::<CardStatisticRow>(conn)?
            .into_iter()
            .map(CardStatisticRow::into_domain)
            .collect()
    }

    fn due_count(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        today: NaiveDate,
    ) -> QueryResult<i64> {
        let scoped_cards = deck_cards::table
            .filter(deck_cards::deck_id.eq_any(deck_ids))
            .select(deck_cards::card_id);

        card_statistics::table
            .filter(card_statistics::user_id.eq(user_id))
            .filter(card_statistics::status.ne(ReviewStatus::New.as_str()))
            .filter(card_statistics::next_review_date.le(today))
            .filter(card_statistics::card_id.eq_any(scoped_cards))
            .count()
            .get_result(conn)
    }

    fn unseen_item_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        limit: i64,
    ) -> QueryResult<Vec<i32>> {
        let started: Vec<i32> = card_statistics::table
            .filter(card_statistics::user_id.eq(user_id))
            .filter(card_statistics::status.ne(ReviewStatus::New.as_str()))
            .select(card_statistics::card_id)
            .load(conn)?;

        deck_cards::table
            .inner_join(cards::table)
            .filter(deck_cards::deck_id.eq_any(deck_ids))
            .filter(cards::is_active.eq(true))
            .filter(deck_cards::card_id.ne_all(started))
            .select(deck_cards::card_id)
            .distinct()
            .order(deck_cards::card_id.asc())
            .limit(limit)
            .load(conn)
    }

    fn load_content(
        conn: &mut SqliteConnection,
        item_ids: &[i32],
    ) -> QueryResult<Vec<(i32, CardContent)>> {
        cards::table
            .filter(cards::card_id.eq_any(item_ids))
            .filter(cards::is_active.eq(true))
            .select((
                cards::card_id,
                (
                    cards::card_id,
                    cards::front,
                    cards::back,
                    cards::grammar_note,
                    cards::audio_url,
                ),
            ))
            .load(conn)
    }

    fn status_counts(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
    ) -> QueryResult<Vec<(String, i64)>> {
        let scoped_cards = deck_cards::table
            .filter(deck_cards::deck_id.eq_any(deck_ids))
            .select(deck_cards::card_id);

        card_statistics::table
            .filter(card_statistics::user_id.eq(user_id))
            .filter(card_statistics::card_id.eq_any(scoped_cards))
            .group_by(card_statistics::status)
            .select((card_statistics::status, count_star()))
            .load(conn)
    }

    fn items_in_scope(conn: &mut SqliteConnection, deck_ids: &[i32]) -> QueryResult<i64> {
        deck_cards::table
            .inner_join(cards::table)
            .filter(deck_cards::deck_id.eq_any(deck_ids))
            .filter(cards::is_active.eq(true))
            .select(count_distinct(deck_cards::card_id))
            .get_result(conn)
    }

    fn review_history(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
    ) -> QueryResult<Vec<ReviewRecord>> {
        let scoped_cards = deck_cards::table
            .filter(deck_cards::deck_id.eq_any(deck_ids))
            .select(deck_cards::card_id);

        let rows: Vec<(i32, i32, i32, chrono::NaiveDateTime)> = card_reviews::table
            .filter(card_reviews::user_id.eq(user_id))
            .filter(card_reviews::card_id.eq_any(scoped_cards))
            .select((
                card_reviews::card_id,
                card_reviews::quality,
                card_reviews::time_taken_seconds,
                card_reviews::reviewed_at,
            ))
            .load(conn)?;

        Ok(rows
            .into_iter()
            .map(|(item_id, quality, time_taken_seconds, reviewed_at)| ReviewRecord {
                item_id,
                quality,
                time_taken_seconds,
                reviewed_at,
            })
            .collect())
    }
}

/// Statistics store adapter for trivia questions.
pub struct QuestionStore;

impl ReviewableStore for QuestionStore {
    type Content = TriviaContent;

    const KIND: &'static str = "question";

    fn find_statistic(
        conn: &mut SqliteConnection,
        user_id: i32,
        item_id: i32,
    ) -> QueryResult<Option<ReviewableStatistic>> {
        let row = question_statistics::table
            .filter(question_statistics::user_id.eq(user_id))
            .filter(question_statistics::question_id.eq(item_id))
            .first::<QuestionStatisticRow>(conn)
            .optional()?;

        match row {
            Some(row) => row.into_domain().map(Some),
            None => Ok(None),
        }
    }

    fn save_statistic(conn: &mut SqliteConnection, stat: &ReviewableStatistic) -> QueryResult<()> {
        diesel::insert_into(question_statistics::table)
            .values(NewQuestionStatistic::from_domain(stat))
            .on_conflict((
                question_statistics::user_id,
                question_statistics::question_id,
            ))
            .do_update()
            .set((
                question_statistics::status.eq(stat.status.as_str()),
                question_statistics::easiness_factor.eq(stat.easiness_factor),
                question_statistics::interval.eq(stat.interval),
                question_statistics::repetitions.eq(stat.repetitions),
                question_statistics::next_review_date.eq(stat.next_review_date),
                question_statistics::updated_at.eq(stat.updated_at),
            ))
            .execute(conn)?;

        Ok(())
    }

    fn initialized_item_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
        item_ids: &[i32],
    ) -> QueryResult<Vec<i32>> {
        question_statistics::table
            .filter(question_statistics::user_id.eq(user_id))
            .filter(question_statistics::question_id.eq_any(item_ids))
            .select(question_statistics::question_id)
            .load(conn)
    }

    fn insert_baselines(
        conn: &mut SqliteConnection,
        stats: &[ReviewableStatistic],
    ) -> QueryResult<usize> {
        let mut inserted = 0;
        for stat in stats {
            inserted += diesel::insert_into(question_statistics::table)
                .values(NewQuestionStatistic::from_domain(stat))
                .on_conflict((
                    question_statistics::user_id,
                    question_statistics::question_id,
                ))
                .do_nothing()
                .execute(conn)?;
        }
        Ok(inserted)
    }

    fn append_review(
        conn: &mut SqliteConnection,
        user_id: i32,
        record: &ReviewRecord,
    ) -> QueryResult<()> {
        diesel::insert_into(question_reviews::table)
            .values(NewQuestionReview {
                user_id,
                question_id: record.item_id,
                quality: record.quality,
                time_taken_seconds: record.time_taken_seconds,
                reviewed_at: record.reviewed_at,
            })
            .execute(conn)?;

        Ok(())
    }

    fn item_exists(conn: &mut SqliteConnection, item_id: i32) -> QueryResult<bool> {
        select(exists(
            trivia_questions::table
                .filter(trivia_questions::question_id.eq(item_id))
                .filter(trivia_questions::is_active.eq(true)),
        ))
        .get_result(conn)
    }

    fn list_active_item_ids(conn: &mut SqliteConnection, deck_id: i32) -> QueryResult<Vec<i32>> {
        trivia_questions::table
            .filter(trivia_questions::deck_id.eq(deck_id))
            .filter(trivia_questions::is_active.eq(true))
            .select(trivia_questions::question_id)
            .order(trivia_questions::question_id.asc())
            .load(conn)
    }

    fn due_statistics(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        today: NaiveDate,
        limit: i64,
    ) -> QueryResult<Vec<ReviewableStatistic>> {
        let scoped_questions = trivia_questions::table
            .filter(trivia_questions::deck_id.eq_any(deck_ids))
            .select(trivia_questions::question_id);

        question_statistics::table
            .filter(question_statistics::user_id.eq(user_id))
            .filter(question_statistics::status.ne(ReviewStatus::New.as_str()))
            .filter(question_statistics::next_review_date.le(today))
            .filter(question_statistics::question_id.eq_any(scoped_questions))
            .order((
                question_statistics::next_review_date.asc(),
                question_statistics::question_id.asc(),
            ))
            .limit(limit)
            .load::<QuestionStatisticRow>(conn)?
            .into_iter()
            .map(QuestionStatisticRow::into_domain)
            .collect()
    }

    fn due_count(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        today: NaiveDate,
    ) -> QueryResult<i64> {
        let scoped_questions = trivia_questions::table
            .filter(trivia_questions::deck_id.eq_any(deck_ids))
            .select(trivia_questions::question_id);

        question_statistics::table
            .filter(question_statistics::user_id.eq(user_id))
            .filter(question_statistics::status.ne(ReviewStatus::New.as_str()))
            .filter(question_statistics::next_review_date.le(today))
            .filter(question_statistics::question_id.eq_any(scoped_questions))
            .count()
            .get_result(conn)
    }

    fn unseen_item_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
        limit: i64,
    ) -> QueryResult<Vec<i32>> {
        let started: Vec<i32> = question_statistics::table
            .filter(question_statistics::user_id.eq(user_id))
            .filter(question_statistics::status.ne(ReviewStatus::New.as_str()))
            .select(question_statistics::question_id)
            .load(conn)?;

        trivia_questions::table
            .filter(trivia_questions::deck_id.eq_any(deck_ids))
            .filter(trivia_questions::is_active.eq(true))
            .filter(trivia_questions::question_id.ne_all(started))
            .select(trivia_questions::question_id)
            .order(trivia_questions::question_id.asc())
            .limit(limit)
            .load(conn)
    }

    fn load_content(
        conn: &mut SqliteConnection,
        item_ids: &[i32],
    ) -> QueryResult<Vec<(i32, TriviaContent)>> {
        trivia_questions::table
            .filter(trivia_questions::question_id.eq_any(item_ids))
            .filter(trivia_questions::is_active.eq(true))
            .select((
                trivia_questions::question_id,
                (
                    trivia_questions::question_id,
                    trivia_questions::prompt,
                    trivia_questions::answer,
                    trivia_questions::category,
                ),
            ))
            .load(conn)
    }

    fn status_counts(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
    ) -> QueryResult<Vec<(String, i64)>> {
        let scoped_questions = trivia_questions::table
            .filter(trivia_questions::deck_id.eq_any(deck_ids))
            .select(trivia_questions::question_id);

        question_statistics::table
            .filter(question_statistics::user_id.eq(user_id))
            .filter(question_statistics::question_id.eq_any(scoped_questions))
            .group_by(question_statistics::status)
            .select((question_statistics::status, count_star()))
            .load(conn)
    }

    fn items_in_scope(conn: &mut SqliteConnection, deck_ids: &[i32]) -> QueryResult<i64> {
        trivia_questions::table
            .filter(trivia_questions::deck_id.eq_any(deck_ids))
            .filter(trivia_questions::is_active.eq(true))
            .count()
            .get_result(conn)
    }

    fn review_history(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_ids: &[i32],
    ) -> QueryResult<Vec<ReviewRecord>> {
        let scoped_questions = trivia_questions::table
            .filter(trivia_questions::deck_id.eq_any(deck_ids))
            .select(trivia_questions::question_id);

        let rows: Vec<(i32, i32, i32, chrono::NaiveDateTime)> = question_reviews::table
            .filter(question_reviews::user_id.eq(user_id))
            .filter(question_reviews::question_id.eq_any(scoped_questions))
            .select((
                question_reviews::question_id,
                question_reviews::quality,
                question_reviews::time_taken_seconds,
                question_reviews::reviewed_at,
            ))
            .load(conn)?;

        Ok(rows
            .into_iter()
            .map(|(item_id, quality, time_taken_seconds, reviewed_at)| ReviewRecord {
                item_id,
                quality,
                time_taken_seconds,
                reviewed_at,
            })
            .collect())
    }
}
