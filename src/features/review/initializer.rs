use std::collections::HashSet;

use chrono::NaiveDateTime;
use diesel::{Connection, SqliteConnection};

use crate::data::models::{InitializationResult, ReviewError, ReviewableStatistic};
use crate::data::repositories::{DeckRepository, ProgressRepository, ReviewableStore, UserRepository};

/// Seeds baseline statistics for the given items of a deck.
///
/// Idempotent: ids that already have a row are counted, not touched. Ids that
/// do not belong to the deck are dropped without failing the call.
pub fn initialize_items<S: ReviewableStore>(
    conn: &mut SqliteConnection,
    user_id: i32,
    deck_id: i32,
    item_ids: &[i32],
    now: NaiveDateTime,
) -> Result<InitializationResult, ReviewError> {
    if !UserRepository::user_exists(conn, user_id)? {
        return Err(ReviewError::NotFound("User not found".into()));
    }
    if !DeckRepository::deck_exists(conn, user_id, deck_id)? {
        return Err(ReviewError::NotFound("Deck not found".into()));
    }

    conn.transaction::<_, ReviewError, _>(|conn| {
        let deck_items: HashSet<i32> = S::list_active_item_ids(conn, deck_id)?.into_iter().collect();

        let mut valid: Vec<i32> = item_ids
            .iter()
            .copied()
            .filter(|id| deck_items.contains(id))
            .collect();
        valid.sort_unstable();
        valid.dedup();

        let existing: HashSet<i32> = S::initialized_item_ids(conn, user_id, &valid)?
            .into_iter()
            .collect();
        let fresh: Vec<i32> = valid
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect();

        let baselines: Vec<ReviewableStatistic> = fresh
            .iter()
            .map(|&item_id| ReviewableStatistic::baseline(user_id, item_id, now))
            .collect();
        let initialized_count = S::insert_baselines(conn, &baselines)?;

        ProgressRepository::ensure_row(conn, user_id, deck_id)?;

        log::info!(
            "initialized {} {} statistics for user {} in deck {} ({} already present)",
            initialized_count,
            S::KIND,
            user_id,
            deck_id,
            valid.len() - initialized_count
        );

        Ok(InitializationResult {
            initialized_count,
            already_exists_count: valid.len() - initialized_count,
            item_ids: fresh,
        })
    })
}

/// Seeds every active item of the deck; an empty deck yields zero rows.
pub fn initialize_deck_for_user<S: ReviewableStore>(
    conn: &mut SqliteConnection,
    user_id: i32,
    deck_id: i32,
    now: NaiveDateTime,
) -> Result<InitializationResult, ReviewError> {
    if !DeckRepository::deck_exists(conn, user_id, deck_id)? {
        return Err(ReviewError::NotFound("Deck not found".into()));
    }

    let item_ids = S::list_active_item_ids(conn, deck_id)?;
    initialize_items::<S>(conn, user_id, deck_id, &item_ids, now)
}
