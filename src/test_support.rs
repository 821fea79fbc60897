use chrono::{Duration, NaiveDate, NaiveDateTime};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::schema::{cards, deck_cards, decks, trivia_questions, user_deck_progress, users};

const SCHEMA: &str = r#"
CREATE TABLE users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL,
    password TEXT NOT NULL
);

CREATE TABLE decks (
    deck_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    deck_name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT 1
);

CREATE TABLE cards (
    card_id INTEGER PRIMARY KEY AUTOINCREMENT,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    grammar_note TEXT,
    audio_url TEXT,
    is_active BOOLEAN NOT NULL DEFAULT 1
);

CREATE TABLE deck_cards (
    deck_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL,
    PRIMARY KEY (deck_id, card_id)
);

CREATE TABLE trivia_questions (
    question_id INTEGER PRIMARY KEY AUTOINCREMENT,
    deck_id INTEGER NOT NULL,
    prompt TEXT NOT NULL,
    answer TEXT NOT NULL,
    category TEXT,
    is_active BOOLEAN NOT NULL DEFAULT 1
);

CREATE TABLE card_statistics (
    stat_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL,
    status TEXT NOT NULL,
    easiness_factor DOUBLE NOT NULL,
    interval INTEGER NOT NULL,
    repetitions INTEGER NOT NULL,
    next_review_date DATE NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    UNIQUE (user_id, card_id)
);

CREATE TABLE question_statistics (
    stat_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    status TEXT NOT NULL,
    easiness_factor DOUBLE NOT NULL,
    interval INTEGER NOT NULL,
    repetitions INTEGER NOT NULL,
    next_review_date DATE NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    UNIQUE (user_id, question_id)
);

CREATE TABLE card_reviews (
    review_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL,
    quality INTEGER NOT NULL,
    time_taken_seconds INTEGER NOT NULL,
    reviewed_at TIMESTAMP NOT NULL
);

CREATE TABLE question_reviews (
    review_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    quality INTEGER NOT NULL,
    time_taken_seconds INTEGER NOT NULL,
    reviewed_at TIMESTAMP NOT NULL
);

CREATE TABLE user_deck_progress (
    user_id INTEGER NOT NULL,
    deck_id INTEGER NOT NULL,
    total_reviews INTEGER NOT NULL DEFAULT 0,
    last_studied_at TIMESTAMP,
    PRIMARY KEY (user_id, deck_id)
);
"#;

pub fn test_conn() -> SqliteConnection {
    let mut conn =
        SqliteConnection::establish(":memory:").expect("Failed to open in-memory database");
    conn.batch_execute(SCHEMA).expect("Failed to apply schema");
    conn
}

/// Fixed reference time so scheduling assertions never straddle midnight.
pub fn days_ago(days: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        - Duration::days(days)
}

pub fn create_user(conn: &mut SqliteConnection, email: &str) -> i32 {
    diesel::insert_into(users::table)
        .values((
            users::email.eq(email),
            users::username.eq(email),
            users::password.eq("hashed"),
        ))
        .execute(conn)
        .expect("Failed to insert user");
    last_insert_rowid(conn)
}

pub fn create_deck(conn: &mut SqliteConnection, user_id: i32, name: &str) -> i32 {
    diesel::insert_into(decks::table)
        .values((
            decks::user_id.eq(user_id),
            decks::deck_name.eq(name),
            decks::is_active.eq(true),
        ))
        .execute(conn)
        .expect("Failed to insert deck");
    last_insert_rowid(conn)
}

pub fn create_card(conn: &mut SqliteConnection, deck_id: i32, front: &str) -> i32 {
    diesel::insert_into(cards::table)
        .values((
            cards::front.eq(front),
            cards::back.eq(format!("{} (back)", front)),
            cards::is_active.eq(true),
        ))
        .execute(conn)
        .expect("Failed to insert card");
    let card_id = last_insert_rowid(conn);

    diesel::insert_into(deck_cards::table)
        .values((deck_cards::deck_id.eq(deck_id), deck_cards::card_id.eq(card_id)))
        .execute(conn)
        .expect("Failed to link card to deck");

    card_id
}

pub fn create_question(conn: &mut SqliteConnection, deck_id: i32, prompt: &str) -> i32 {
    diesel::insert_into(trivia_questions::table)
        .values((
            trivia_questions::deck_id.eq(deck_id),
            trivia_questions::prompt.eq(prompt),
            trivia_questions::answer.eq(format!("{} (answer)", prompt)),
            trivia_questions::is_active.eq(true),
        ))
        .execute(conn)
        .expect("Failed to insert question");
    last_insert_rowid(conn)
}

pub fn deactivate_card(conn: &mut SqliteConnection, card_id: i32) {
    diesel::update(cards::table.filter(cards::card_id.eq(card_id)))
        .set(cards::is_active.eq(false))
        .execute(conn)
        .expect("Failed to deactivate card");
}

pub fn progress_for(
    conn: &mut SqliteConnection,
    user_id: i32,
    deck_id: i32,
) -> Option<(i32, Option<NaiveDateTime>)> {
    user_deck_progress::table
        .filter(user_deck_progress::user_id.eq(user_id))
        .filter(user_deck_progress::deck_id.eq(deck_id))
        .select((
            user_deck_progress::total_reviews,
            user_deck_progress::last_studied_at,
        ))
        .first(conn)
        .optional()
        .expect("Failed to read deck progress")
}

fn last_insert_rowid(conn: &mut SqliteConnection) -> i32 {
    diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
        .get_result::<i32>(conn)
        .expect("Failed to read last insert id")
}
