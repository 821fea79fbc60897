use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;

use crate::schema::decks;

pub struct DeckRepository;

impl DeckRepository {
    /// True when the deck exists, is active, and belongs to the given user.
    pub fn deck_exists(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_id: i32,
    ) -> Result<bool, diesel::result::Error> {
        select(exists(
            decks::table
                .filter(decks::deck_id.eq(deck_id))
                .filter(decks::user_id.eq(user_id))
                .filter(decks::is_active.eq(true)),
        ))
        .get_result(conn)
    }

    /// All active deck ids owned by the user; the "all decks" study scope.
    pub fn active_deck_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<i32>, diesel::result::Error> {
        decks::table
            .filter(decks::user_id.eq(user_id))
            .filter(decks::is_active.eq(true))
            .select(decks::deck_id)
            .order(decks::deck_id.asc())
            .load(conn)
    }
}
