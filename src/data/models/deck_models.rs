use diesel::Queryable;
use serde::Serialize;

/// Vocabulary card as presented in a study queue
#[derive(Debug, Clone, Serialize, Queryable)]
pub struct CardContent {
    pub card_id: i32,         // Auto-generated card ID
    pub front: String,        // Prompt side
    pub back: String,         // Answer side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar_note: Option<String>, // Optional grammar reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>, // Optional pronunciation audio reference
}

/// Trivia question as presented in a study queue
#[derive(Debug, Clone, Serialize, Queryable)]
pub struct TriviaContent {
    pub question_id: i32,     // Auto-generated question ID
    pub prompt: String,       // Question text
    pub answer: String,       // Expected answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>, // Optional topic label
}
