use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::schema::{card_reviews, card_statistics, question_reviews, question_statistics};

/// Default easiness factor assigned to freshly initialized items.
pub const INITIAL_EASINESS_FACTOR: f64 = 2.5;

/// Lower bound the easiness factor can never drop below.
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

/// Scheduling stage of a reviewable item for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    New,
    Learning,
    Review,
    Mastered,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::New => "new",
            ReviewStatus::Learning => "learning",
            ReviewStatus::Review => "review",
            ReviewStatus::Mastered => "mastered",
        }
    }

    pub fn parse(value: &str) -> Option<ReviewStatus> {
        match value {
            "new" => Some(ReviewStatus::New),
            "learning" => Some(ReviewStatus::Learning),
            "review" => Some(ReviewStatus::Review),
            "mastered" => Some(ReviewStatus::Mastered),
            _ => None,
        }
    }
}

/// Per-(user, item) scheduling state, the unit the SM-2 update operates on.
/// The same shape backs both vocabulary cards and trivia questions.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewableStatistic {
    pub user_id: i32,
    pub item_id: i32,
    pub status: ReviewStatus,
    pub easiness_factor: f64,
    pub interval: i32,
    pub repetitions: i32,
    pub next_review_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl ReviewableStatistic {
    /// Baseline state for an item the user has never reviewed: immediately due.
    pub fn baseline(user_id: i32, item_id: i32, now: NaiveDateTime) -> Self {
        ReviewableStatistic {
            user_id,
            item_id,
            status: ReviewStatus::New,
            easiness_factor: INITIAL_EASINESS_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review_date: now.date(),
            updated_at: now,
        }
    }
}

/// One submitted review, kept as an append-only history record.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRecord {
    pub item_id: i32,
    pub quality: i32,
    pub time_taken_seconds: i32,
    pub reviewed_at: NaiveDateTime,
}

#[derive(Queryable, Debug)]
pub struct CardStatisticRow {
    pub stat_id: i32,
    pub user_id: i32,
    pub card_id: i32,
    pub status: String,
    pub easiness_factor: f64,
    pub interval: i32,
    pub repetitions: i32,
    pub next_review_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl CardStatisticRow {
    pub fn into_domain(self) -> Result<ReviewableStatistic, diesel::result::Error> {
        let status = parse_status(&self.status)?;
        Ok(ReviewableStatistic {
            user_id: self.user_id,
            item_id: self.card_id,
            status,
            easiness_factor: self.easiness_factor,
            interval: self.interval,
            repetitions: self.repetitions,
            next_review_date: self.next_review_date,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = card_statistics)]
pub struct NewCardStatistic {
    pub user_id: i32,
    pub card_id: i32,
    pub status: String,
    pub easiness_factor: f64,
    pub interval: i32,
    pub repetitions: i32,
    pub next_review_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl NewCardStatistic {
    pub fn from_domain(stat: &ReviewableStatistic) -> Self {
        NewCardStatistic {
            user_id: stat.user_id,
            card_id: stat.item_id,
            status: stat.status.as_str().to_string(),
            easiness_factor: stat.easiness_factor,
            interval: stat.interval,
            repetitions: stat.repetitions,
            next_review_date: stat.next_review_date,
            updated_at: stat.updated_at,
        }
    }
}

#[derive(Queryable, Debug)]
pub struct QuestionStatisticRow {
    pub stat_id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub status: String,
    pub easiness_factor: f64,
    pub interval: i32,
    pub repetitions: i32,
    pub next_review_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl QuestionStatisticRow {
    pub fn into_domain(self) -> Result<ReviewableStatistic, diesel::result::Error> {
        let status = parse_status(&self.status)?;
        Ok(ReviewableStatistic {
            user_id: self.user_id,
            item_id: self.question_id,
            status,
            easiness_factor: self.easiness_factor,
            interval: self.interval,
            repetitions: self.repetitions,
            next_review_date: self.next_review_date,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = question_statistics)]
pub struct NewQuestionStatistic {
    pub user_id: i32,
    pub question_id: i32,
    pub status: String,
    pub easiness_factor: f64,
    pub interval: i32,
    pub repetitions: i32,
    pub next_review_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl NewQuestionStatistic {
    pub fn from_domain(stat: &ReviewableStatistic) -> Self {
        NewQuestionStatistic {
            user_id: stat.user_id,
            question_id: stat.item_id,
            status: stat.status.as_str().to_string(),
            easiness_factor: stat.easiness_factor,
            interval: stat.interval,
            repetitions: stat.repetitions,
            next_review_date: stat.next_review_date,
            updated_at: stat.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = card_reviews)]
pub struct NewCardReview {
    pub user_id: i32,
    pub card_id: i32,
    pub quality: i32,
    pub time_taken_seconds: i32,
    pub reviewed_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = question_reviews)]
pub struct NewQuestionReview {
    pub user_id: i32,
    pub question_id: i32,
    pub quality: i32,
    pub time_taken_seconds: i32,
    pub reviewed_at: NaiveDateTime,
}

fn parse_status(value: &str) -> Result<ReviewStatus, diesel::result::Error> {
    ReviewStatus::parse(value).ok_or_else(|| {
        diesel::result::Error::DeserializationError(
            format!("unknown review status: {}", value).into(),
        )
    })
}
