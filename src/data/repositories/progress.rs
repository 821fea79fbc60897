use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::user_deck_progress;

pub struct ProgressRepository;

impl ProgressRepository {
    /// Creates the per-deck progress row if it is missing.
    pub fn ensure_row(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_id: i32,
    ) -> Result<(), diesel::result::Error> {
        diesel::insert_into(user_deck_progress::table)
            .values((
                user_deck_progress::user_id.eq(user_id),
                user_deck_progress::deck_id.eq(deck_id),
                user_deck_progress::total_reviews.eq(0),
            ))
            .on_conflict((user_deck_progress::user_id, user_deck_progress::deck_id))
            .do_nothing()
            .execute(conn)?;

        Ok(())
    }

    /// Bumps the review counter and stamps the last study time.
    pub fn record_reviews(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_id: i32,
        count: i32,
        studied_at: NaiveDateTime,
    ) -> Result<(), diesel::result::Error> {
        Self::ensure_row(conn, user_id, deck_id)?;

        diesel::update(
            user_deck_progress::table
                .filter(user_deck_progress::user_id.eq(user_id))
                .filter(user_deck_progress::deck_id.eq(deck_id)),
        )
        .set((
            user_deck_progress::total_reviews.eq(user_deck_progress::total_reviews + count),
            user_deck_progress::last_studied_at.eq(studied_at),
        ))
        .execute(conn)?;

        Ok(())
    }
}
